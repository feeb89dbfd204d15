use std::fs;

use lp_page::{PageConfig, SortDirection};
use lp_page_cli::{
    load_config, read_records, render_export, sort_csv_file, sort_csv_table, write_output,
};

const RECORDS: &str = r#"[
  {"parameter_name": "功率", "value": "5", "unit": "W", "category": "光学",
   "paper_title": "X\"Y", "paper_id": "1", "confidence_score": "0.9"},
  {"parameter_name": "波长", "value": 1064, "unit": "nm"}
]"#;

#[test]
fn export_writes_page_csv() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("params.json");
    let output = dir.path().join("out.csv");
    fs::write(&input, RECORDS).unwrap();

    let records = read_records(&input).unwrap();
    let csv = render_export(&records, false).unwrap();
    write_output(&output, &csv).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(
        written,
        "参数名称,数值,单位,类别,论文标题,论文ID,可信度\n\
         \"功率\",\"5\",\"W\",\"光学\",\"X\"\"Y\",\"1\",\"0.9\"\n\
         \"波长\",\"1064\",\"nm\",\"\",\"\",\"\",\"\"\n"
    );
}

#[test]
fn export_data_uri_is_percent_encoded() {
    let records = serde_json::from_str::<Vec<lp_page::ParameterRecord>>(RECORDS).unwrap();
    let uri = render_export(&records, true).unwrap();
    assert!(uri.starts_with("data:text/csv;charset=utf-8,%E5%8F%82"));
    assert!(!uri.contains('\n'));
    assert!(uri.contains("%22X%22%22Y%22"));
}

#[test]
fn export_of_empty_array_fails_with_alert_text() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.json");
    fs::write(&input, "[]").unwrap();

    let records = read_records(&input).unwrap();
    let err = render_export(&records, false).unwrap_err();
    assert_eq!(err.to_string(), "没有可导出的参数");
}

#[test]
fn sort_replays_header_clicks() {
    let table = "名称,数值\na,10\nb,2\nc,33\n";
    let config = PageConfig::default();

    let once = sort_csv_table(table.as_bytes(), "数值", true, 1, &config).unwrap();
    assert_eq!(once.csv, "名称,数值\nb,2\na,10\nc,33\n");
    assert_eq!(once.direction, Some(SortDirection::Ascending));

    let twice = sort_csv_table(table.as_bytes(), "1", true, 2, &config).unwrap();
    assert_eq!(twice.csv, "名称,数值\nc,33\na,10\nb,2\n");
    assert_eq!(twice.direction, Some(SortDirection::Descending));
}

#[test]
fn sort_without_numeric_flag_compares_text() {
    let table = "名称,数值\na,10\nb,2\nc,33\n";
    let outcome =
        sort_csv_table(table.as_bytes(), "数值", false, 1, &PageConfig::default()).unwrap();
    assert_eq!(outcome.csv, "名称,数值\na,10\nb,2\nc,33\n");
}

#[test]
fn text_sort_orders_han_by_pinyin() {
    let table = "名称\n乙\n甲\n丙\n";
    let config = PageConfig::default();

    let once = sort_csv_table(table.as_bytes(), "名称", false, 1, &config).unwrap();
    assert_eq!(once.csv, "名称\n丙\n甲\n乙\n");

    let twice = sort_csv_table(table.as_bytes(), "名称", false, 2, &config).unwrap();
    assert_eq!(twice.csv, "名称\n乙\n甲\n丙\n");
}

#[test]
fn sort_honours_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("page.json");
    let table_path = dir.path().join("table.csv");
    fs::write(&config_path, r#"{"numeric_class": "num", "asc_class": "up"}"#).unwrap();
    fs::write(&table_path, "v\n3\n1\n").unwrap();

    let config = load_config(Some(&config_path)).unwrap();
    let outcome = sort_csv_file(&table_path, "v", true, 1, &config).unwrap();
    assert_eq!(outcome.csv, "v\n1\n3\n");
    assert_eq!(outcome.direction.map(|d| d.class(&config).to_string()), Some("up".into()));
}

#[test]
fn unknown_column_is_an_error() {
    let err = sort_csv_table("a\n1\n".as_bytes(), "b", false, 1, &PageConfig::default())
        .unwrap_err();
    assert!(err.to_string().contains("no column named"));
}
