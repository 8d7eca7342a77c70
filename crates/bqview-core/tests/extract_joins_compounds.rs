//! Tests for join chains, parenthesized sources, set operations, and
//! star modifiers.

mod common;
use common::*;

#[test]
fn comma_join() {
    assert_eq!(
        tables("SELECT * FROM a_t, b_t"),
        set(&[t1("a_t"), t1("b_t")])
    );
}

#[test]
fn inner_join_on() {
    assert_eq!(
        tables("SELECT * FROM orders JOIN customers ON orders.customer_id = customers.id"),
        set(&[t1("customers"), t1("orders")])
    );
}

#[test]
fn outer_join_chain() {
    assert_eq!(
        tables(
            "SELECT * FROM a_t \
             LEFT OUTER JOIN b_t ON a_t.x = b_t.x \
             LEFT JOIN c_t USING (x)"
        ),
        set(&[t1("a_t"), t1("b_t"), t1("c_t")])
    );
}

#[test]
fn right_and_full_joins() {
    assert_eq!(
        tables(
            "SELECT * FROM a_t \
             RIGHT JOIN b_t USING (k) \
             FULL OUTER JOIN c_t USING (k)"
        ),
        set(&[t1("a_t"), t1("b_t"), t1("c_t")])
    );
}

#[test]
fn cross_and_natural_joins() {
    assert_eq!(
        tables("SELECT * FROM a_t CROSS JOIN b_t NATURAL JOIN c_t"),
        set(&[t1("a_t"), t1("b_t"), t1("c_t")])
    );
}

#[test]
fn using_with_dotted_columns() {
    assert_eq!(
        tables("SELECT * FROM a_t JOIN b_t USING (k, payload.id)"),
        set(&[t1("a_t"), t1("b_t")])
    );
}

#[test]
fn parenthesized_join_group() {
    assert_eq!(
        tables("SELECT * FROM (t_left JOIN t_right USING (k))"),
        set(&[t1("t_left"), t1("t_right")])
    );
}

#[test]
fn subquery_source_with_alias() {
    assert_eq!(
        tables("SELECT sub.id FROM (SELECT id FROM inner_tab) AS sub"),
        set(&[t1("inner_tab")])
    );
}

#[test]
fn double_wrapped_subquery() {
    assert_eq!(
        tables("SELECT * FROM ((SELECT a FROM t_base) sub_x)"),
        set(&[t1("t_base")])
    );
}

#[test]
fn union_branches_all_collected() {
    assert_eq!(
        tables(
            "SELECT a FROM t_first \
             UNION ALL SELECT a FROM t_second \
             UNION DISTINCT SELECT a FROM t_third"
        ),
        set(&[t1("t_first"), t1("t_second"), t1("t_third")])
    );
}

#[test]
fn intersect_and_except() {
    assert_eq!(
        tables(
            "SELECT a FROM x_t \
             INTERSECT DISTINCT SELECT a FROM y_t \
             EXCEPT DISTINCT SELECT a FROM z_t"
        ),
        set(&[t1("x_t"), t1("y_t"), t1("z_t")])
    );
}

#[test]
fn parenthesized_compound_branches() {
    assert_eq!(
        tables("(SELECT a FROM br_one) UNION ALL (SELECT a FROM br_two)"),
        set(&[t1("br_one"), t1("br_two")])
    );
}

#[test]
fn compound_with_order_and_limit() {
    assert_eq!(
        tables(
            "SELECT a FROM u_one UNION ALL SELECT a FROM u_two \
             ORDER BY a LIMIT 5"
        ),
        set(&[t1("u_one"), t1("u_two")])
    );
}

#[test]
fn star_except_columns() {
    assert_eq!(
        tables("SELECT * EXCEPT (internal_id, sync_time) FROM crm.contacts"),
        set(&[t2("crm", "contacts")])
    );
    assert_eq!(
        tables("SELECT c.* EXCEPT (internal_id) FROM crm.contacts c"),
        set(&[t2("crm", "contacts")])
    );
}

#[test]
fn star_except_distinguishes_compound() {
    // EXCEPT over a parenthesized core is a set operation, not a modifier
    assert_eq!(
        tables("SELECT * FROM all_rows EXCEPT DISTINCT SELECT * FROM removed_rows"),
        set(&[t1("all_rows"), t1("removed_rows")])
    );
    assert_eq!(tables("SELECT * EXCEPT (SELECT 1)"), set(&[]));
}

#[test]
fn unnest_is_not_a_table() {
    assert_eq!(
        tables("SELECT x FROM main_t, UNNEST(main_t.items) AS item_row"),
        set(&[t1("main_t")])
    );
}
