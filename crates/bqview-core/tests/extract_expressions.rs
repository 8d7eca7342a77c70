//! Tests for the expression grammar: operators, CASE, casts, calls,
//! windows, arrays, structs, and literals.

mod common;
use common::*;

#[test]
fn arithmetic_and_comparison_operators() {
    assert_eq!(
        tables("SELECT -x + ~y * 2 FROM expr_t WHERE a <= b AND c != d AND e <> f OR g >= h"),
        set(&[t1("expr_t")])
    );
}

#[test]
fn shift_bit_and_concat_operators() {
    assert_eq!(
        tables("SELECT a << 2, b | c, d & e, f >> 1, s || '-suffix' FROM bits_t"),
        set(&[t1("bits_t")])
    );
}

#[test]
fn case_expression() {
    assert_eq!(
        tables(
            "SELECT CASE WHEN amount > 0 THEN 'credit' ELSE 'debit' END \
             FROM ledger.entries"
        ),
        set(&[t2("ledger", "entries")])
    );
}

#[test]
fn case_with_operand() {
    assert_eq!(
        tables("SELECT CASE status WHEN 1 THEN 'a' WHEN 2 THEN 'b' END FROM q_t"),
        set(&[t1("q_t")])
    );
}

#[test]
fn case_with_lowercase_from() {
    assert_eq!(
        tables("SELECT CASE 1 WHEN 1 THEN -1 ELSE -2 END from test_table"),
        set(&[t1("test_table")])
    );
}

#[test]
fn cast_and_safe_cast() {
    assert_eq!(
        tables("SELECT CAST(x AS INT64), SAFE_CAST(y AS STRING) FROM typed_t"),
        set(&[t1("typed_t")])
    );
}

#[test]
fn between_binds_its_own_and() {
    assert_eq!(
        tables("SELECT * FROM ranges_t WHERE v BETWEEN lo AND hi AND w > 2"),
        set(&[t1("ranges_t")])
    );
}

#[test]
fn in_list_and_in_unnest() {
    assert_eq!(
        tables("SELECT * FROM s_t WHERE status IN ('a', 'b') AND x IN UNNEST(arr_col)"),
        set(&[t1("s_t")])
    );
}

#[test]
fn negated_predicates() {
    assert_eq!(
        tables(
            "SELECT * FROM n_t WHERE a NOT IN (1, 2) \
             AND b NOT LIKE '%x%' \
             AND c IS NOT NULL \
             AND d NOT NULL \
             AND e ISNULL"
        ),
        set(&[t1("n_t")])
    );
}

#[test]
fn exists_subquery() {
    assert_eq!(
        tables("SELECT * FROM m_t WHERE EXISTS (SELECT 1 FROM other_t WHERE other_t.id = m_t.id)"),
        set(&[t1("m_t"), t1("other_t")])
    );
}

#[test]
fn window_function_with_partition() {
    assert_eq!(
        tables("SELECT dept, RANK() OVER (PARTITION BY dept ORDER BY salary DESC) FROM hr.salaries"),
        set(&[t2("hr", "salaries")])
    );
}

#[test]
fn named_window_clause() {
    assert_eq!(
        tables(
            "SELECT FIRST_VALUE(finish_time IGNORE NULLS) OVER w1 \
             FROM finishers \
             WINDOW w1 AS (PARTITION BY division ORDER BY finish_time)"
        ),
        set(&[t1("finishers")])
    );
}

#[test]
fn window_frames() {
    assert_eq!(
        tables(
            "SELECT SUM(x) OVER (ORDER BY y ROWS BETWEEN 2 PRECEDING AND CURRENT ROW), \
                    AVG(x) OVER (ORDER BY y RANGE UNBOUNDED PRECEDING) \
             FROM frame_t"
        ),
        set(&[t1("frame_t")])
    );
}

#[test]
fn qualify_clause() {
    assert_eq!(
        tables(
            "SELECT * FROM qual_t \
             QUALIFY ROW_NUMBER() OVER (PARTITION BY g ORDER BY ts DESC) = 1"
        ),
        set(&[t1("qual_t")])
    );
}

#[test]
fn interval_arguments() {
    assert_eq!(
        tables(
            "SELECT DATE_ADD(d, INTERVAL 1 DAY), TIMESTAMP_SUB(ts, INTERVAL 30 MINUTE) \
             FROM dt_t"
        ),
        set(&[t1("dt_t")])
    );
}

#[test]
fn generator_calls_are_not_tables() {
    assert!(tables("SELECT GENERATE_ARRAY(5, NULL, 1)").is_empty());
    assert!(tables(
        "SELECT d FROM UNNEST(GENERATE_DATE_ARRAY('2016-10-05', '2016-10-08')) AS d"
    )
    .is_empty());
}

#[test]
fn array_literals_and_indexing() {
    assert_eq!(
        tables("SELECT ARRAY<INT64>[1, 2], arr[OFFSET(0)], items[ORDINAL(1)], [3, 4] FROM arr_src"),
        set(&[t1("arr_src")])
    );
}

#[test]
fn struct_literals() {
    assert_eq!(
        tables("SELECT STRUCT<INT64, STRING>(1, 'a'), STRUCT(x AS a, y AS b) FROM s_src"),
        set(&[t1("s_src")])
    );
}

#[test]
fn string_agg_forms() {
    assert_eq!(
        tables("SELECT STRING_AGG(name, ', ' ORDER BY name DESC LIMIT 10) FROM agg_src"),
        set(&[t1("agg_src")])
    );
    assert_eq!(
        tables("SELECT STRING_AGG(DISTINCT name) FROM agg_src"),
        set(&[t1("agg_src")])
    );
}

#[test]
fn regex_literal_argument() {
    assert_eq!(
        tables("SELECT REGEXP_EXTRACT(col_a, r'^\\d+') FROM rex_t"),
        set(&[t1("rex_t")])
    );
}

#[test]
fn extract_date_part() {
    assert_eq!(
        tables("SELECT EXTRACT(DAY FROM event_ts) FROM ev_t"),
        set(&[t1("ev_t")])
    );
}

#[test]
fn current_timestamp_variants() {
    assert_eq!(
        tables(
            "SELECT CURRENT_DATE, CURRENT_TIMESTAMP(), CURRENT_DATE('America/New_York') \
             FROM now_t"
        ),
        set(&[t1("now_t")])
    );
}

#[test]
fn typed_date_literals() {
    assert_eq!(
        tables("SELECT DATE '2024-01-02', TIMESTAMP \"2024-01-02 03:04:05\" FROM lit_t"),
        set(&[t1("lit_t")])
    );
}

#[test]
fn empty_string_literal_is_an_expression() {
    assert_eq!(
        tables("SELECT '' FROM lit_t WHERE name != \"\""),
        set(&[t1("lit_t")])
    );
}

#[test]
fn function_keywords_as_column_aliases() {
    assert_eq!(
        tables("SELECT a AS ESCAPE, b AS CURRENT_TIME, c AS rank FROM alias_t"),
        set(&[t1("alias_t")])
    );
}

#[test]
fn function_keywords_as_path_heads() {
    assert_eq!(
        tables("SELECT current.value, date.year FROM path_t"),
        set(&[t1("path_t")])
    );
}

#[test]
fn qualified_function_calls() {
    assert_eq!(
        tables("SELECT proj.ds.my_udf(x), ds.other_udf(y) FROM udf_t"),
        set(&[t1("udf_t")])
    );
}

#[test]
fn parameter_markers() {
    assert_eq!(
        tables("SELECT * FROM param_t WHERE id = @user_id AND k = ? AND v = :named AND w = $dollar"),
        set(&[t1("param_t")])
    );
}

#[test]
fn count_distinct() {
    assert_eq!(
        tables("SELECT COUNT(DISTINCT x) FROM c_t"),
        set(&[t1("c_t")])
    );
}

#[test]
fn struct_valued_parenthesized_list() {
    assert_eq!(
        tables("SELECT * FROM pair_t WHERE (a, b) IN ((1, 2), (3, 4))"),
        set(&[t1("pair_t")])
    );
}
