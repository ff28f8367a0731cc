//! Integration tests for configuration loading and parallel rendering.

use std::fs;

use dynsql::prelude::*;
use dynsql::query::config::CONFIG_FILE_NAME;
use dynsql::query::{ErrorCode, PlaceholderKind};
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, contents).unwrap();
    (dir, path)
}

fn wide_model(width: i32) -> WhereModel {
    let id: SqlColumn<i32> = SqlColumn::of("id");
    let status: SqlColumn<String> = SqlColumn::of("status");
    (1..width)
        .fold(where_(&id, is_equal_to(0)), |builder, n| {
            if n % 3 == 0 {
                builder.or_group(
                    &id,
                    is_between(n, n + 5),
                    [and(&status, is_not_equal_to(format!("s{}", n)))],
                )
            } else {
                builder.and(&id, is_not_in(vec![n, -n]).unwrap())
            }
        })
        .build()
}

#[test]
fn test_config_drives_rendering() {
    let (_dir, path) = write_config(
        r#"
        parameter_tag = "w"
        placeholder = "colon"
        qualify_columns = false
        "#,
    );
    let config = RenderConfig::from_file(&path).unwrap();
    assert_eq!(config.placeholder, PlaceholderKind::Colon);

    let table = SqlTable::of("foo").with_alias("a");
    let column1: SqlColumn<i32> = SqlColumn::of("column1").in_table(&table);
    let clause = where_(&column1, is_less_than(5))
        .or(&column1, is_null())
        .build()
        .render(&config.render_options())
        .unwrap();

    assert_snapshot!(clause.clause(), @"where column1 < :w1 or column1 is null");
    assert_eq!(clause.parameters()["w1"], ParameterValue::Int(5));
}

#[test]
fn test_where_keyword_can_be_disabled() {
    let config: RenderConfig = "where_keyword = false".parse().unwrap();
    let id: SqlColumn<i64> = SqlColumn::of("id");
    let clause = where_(&id, is_equal_to(1))
        .build()
        .render(&config.render_options())
        .unwrap();
    assert_eq!(clause.clause(), "id = {parameters.p1}");
}

#[test]
fn test_invalid_config_file() {
    let (_dir, path) = write_config("placeholder = \"question\"");
    let err = RenderConfig::from_file(&path).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidConfiguration);
    assert!(!err.is_programming_error());
}

#[test]
fn test_parallel_config_from_file() {
    let (_dir, path) = write_config(
        r#"
        [parallel]
        max_workers = 3
        min_criteria_per_worker = 2
        "#,
    );
    let config = RenderConfig::from_file(&path).unwrap();
    assert_eq!(config.parallel, ParallelConfig::new(3, 2));

    let model = wide_model(60);
    let options = config.render_options();
    let sequential = model.render(&options).unwrap();
    let parallel = model.render_parallel(&options, &config.parallel).unwrap();

    assert_eq!(parallel, sequential);
    assert_eq!(parallel.parameters().len(), model.parameter_count());
}

#[test]
fn test_parallel_free_function() {
    let model = wide_model(25);
    let options = RenderOptions::new().with_placeholder(PlaceholderStyle::At);
    let rendered =
        render_criteria_parallel(model.criteria(), &options, &ParallelConfig::new(5, 1)).unwrap();

    assert!(rendered.clause().starts_with("where id = @p1 and id not in (@p2, @p3)"));
    assert_eq!(rendered, model.render(&options).unwrap());
}
