//! Unit tests for projection, sorting and export.

use castboard::data::{
    CsvExporter, SortColumn, SortDirection, TableSort, chart_csv, project,
};
use castboard::services::ChartExporter;
use castboard::types::CharacterRecord;
use tempfile::tempdir;

fn batch() -> Vec<CharacterRecord> {
    vec![
        CharacterRecord::new("1", "Mulan")
            .with_films(&["Mulan", "Mulan II"])
            .with_tv_shows(&["Sofia the First"])
            .with_allies(&["Mushu", "Cri-Kee"]),
        CharacterRecord::new("2", "Mushu").with_films(&["Mulan"]),
        CharacterRecord::new("3", "Chi-Fu").with_enemies(&["Mulan"]),
        CharacterRecord::new("4", "Shang").with_films(&["Mulan"]),
    ]
}

#[test]
fn test_rows_and_points_follow_batch_order() {
    let projection = project(&batch());

    let names: Vec<_> = projection.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Mulan", "Mushu", "Chi-Fu", "Shang"]);
    let values: Vec<_> = projection.chart.points.iter().map(|p| p.value).collect();
    assert_eq!(values, [2, 1, 0, 1]);

    assert_eq!(projection.rows[0].tv_show_count, 1);
    assert_eq!(projection.rows[0].allies, ["Mushu", "Cri-Kee"]);
    assert_eq!(projection.len(), 4);
}

#[test]
fn test_empty_batch_projects_to_empty() {
    let projection = project(&[]);
    assert!(projection.is_empty());
    assert!(projection.chart.points.is_empty());
    assert_eq!(projection.chart.title, "Number of movies by character");
    assert_eq!(projection.chart.name, "Number of movies");
}

#[test]
fn test_percentages_and_tooltip() {
    let chart = project(&batch()).chart;

    assert_eq!(chart.total(), 4);
    assert_eq!(chart.percentage(0), Some(50.0));
    assert_eq!(chart.percentage(2), Some(0.0));
    assert_eq!(chart.percentage(9), None);
    assert_eq!(
        chart.tooltip(0).unwrap(),
        "Mulan: 50.00%\nList of movies:\n- Mulan\n- Mulan II"
    );
    assert_eq!(chart.tooltip(2).unwrap(), "Chi-Fu: 0.00%\nList of movies:");
}

#[test]
fn test_sorting_by_allies_uses_joined_names() {
    let rows = project(&batch()).rows;
    let sort = TableSort::new(SortColumn::Allies, SortDirection::Descending);
    let order = sort.sorted_indices(&rows);
    assert_eq!(order[0], 0);
    // Ties keep server order.
    assert_eq!(&order[1..], [1, 2, 3]);
}

#[test]
fn test_sort_parsing() {
    assert_eq!(SortColumn::parse("TV"), Some(SortColumn::TvShows));
    assert_eq!(SortColumn::parse("games"), Some(SortColumn::VideoGames));
    assert_eq!(SortColumn::parse("films"), None);
    assert_eq!(SortDirection::parse("DESC"), Some(SortDirection::Descending));
    assert_eq!(SortDirection::parse("sideways"), None);
    assert_eq!(SortColumn::all().len(), 5);
}

#[test]
fn test_csv_export_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("films.csv");
    let exporter = CsvExporter::new(&path);

    let projection = project(&batch());
    assert_eq!(exporter.export(&projection).unwrap(), path);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        chart_csv(&projection.chart)
    );
    assert!(chart_csv(&projection.chart).starts_with("Character Name,Number of movies\n"));
}
