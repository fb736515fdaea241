use chrono::{NaiveDate, TimeZone, Utc};
use visaflow_core::export::{
    customer_rows, export_csv, ledger_print_rows, ledger_rows, parse_csv, to_csv,
};
use visaflow_core::{
    Category, Customer, CustomerDraft, EntryType, FinanceEntry, FinanceEntryDraft, FlatRecord,
    PrintReport, Record, VisaStatus,
};

fn entry(amount: &str, description: &str) -> FinanceEntry {
    FinanceEntry::from_draft(
        "e-1".to_string(),
        FinanceEntryDraft::new(
            EntryType::Expense,
            Category::ServiceCharge,
            amount.parse().unwrap(),
            description,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        ),
        Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap(),
    )
}

#[test]
fn csv_has_header_then_rows_and_quotes_comma_cells() {
    let rows = vec![
        FlatRecord::new().with("Name", "Jane").with("Note", "a, b"),
        FlatRecord::new().with("Name", "Tom").with("Note", "plain"),
    ];

    assert_eq!(
        to_csv(&rows).unwrap(),
        "Name,Note\nJane,\"a, b\"\nTom,plain"
    );
}

#[test]
fn csv_columns_follow_first_appearance_and_fill_missing_cells() {
    let rows = vec![
        FlatRecord::new().with("A", "1"),
        FlatRecord::new().with("B", "2").with("A", "3"),
    ];

    assert_eq!(to_csv(&rows).unwrap(), "A,B\n1,\n3,2");
}

#[test]
fn empty_export_produces_nothing() {
    assert!(to_csv(&[]).is_none());
    assert!(export_csv(&[], "customers-export").is_none());
}

#[test]
fn csv_round_trip_reproduces_flat_values() {
    let rows = vec![
        FlatRecord::new()
            .with("Date", "1/5/2024")
            .with("Description", "Visa, fast track")
            .with("Amount", "12.5"),
        FlatRecord::new()
            .with("Date", "2/1/2024")
            .with("Description", "Ticket")
            .with("Amount", "300"),
    ];

    let parsed = parse_csv(&to_csv(&rows).unwrap());
    assert_eq!(parsed[0], vec!["Date", "Description", "Amount"]);
    for (row, cells) in rows.iter().zip(&parsed[1..]) {
        let values: Vec<&str> = ["Date", "Description", "Amount"]
            .iter()
            .map(|label| row.get(label).unwrap())
            .collect();
        assert_eq!(cells, &values);
    }
}

#[test]
fn csv_round_trip_keeps_quotes_and_line_breaks() {
    let rows = vec![
        FlatRecord::new()
            .with("Description", "\"VIP\" client")
            .with("Amount", "5"),
        FlatRecord::new()
            .with("Description", "line1\nline2")
            .with("Amount", "7"),
        FlatRecord::new()
            .with("Description", "say \"hi\", then\r\nleave")
            .with("Amount", "9"),
    ];

    let parsed = parse_csv(&to_csv(&rows).unwrap());
    assert_eq!(
        parsed,
        vec![
            vec!["Description", "Amount"],
            vec!["\"VIP\" client", "5"],
            vec!["line1\nline2", "7"],
            vec!["say \"hi\", then\r\nleave", "9"],
        ]
    );
}

#[test]
fn csv_export_writes_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let entries = [entry("40", "Medical")];
    let refs: Vec<&FinanceEntry> = entries.iter().collect();

    let export = export_csv(&ledger_rows(&refs), "finance-ledger").unwrap();
    assert_eq!(export.file_name, "finance-ledger.csv");

    let path = export.write_to(dir.path()).unwrap();
    let written = std::fs::read_to_string(path).unwrap();
    assert_eq!(
        written,
        "Date,Type,Category,Amount,Description\n1/5/2024,Expense,Service Charge,40,Medical"
    );
}

#[test]
fn customer_rows_use_table_labels() {
    let customer = Customer::from_draft(
        "c-1".to_string(),
        CustomerDraft::new("Doe, Jane", "P123", "Alice").with_visa_status(VisaStatus::Approved),
        Utc.with_ymd_and_hms(2024, 3, 9, 8, 0, 0).unwrap(),
    );

    let csv = to_csv(&customer_rows(&[&customer])).unwrap();
    assert_eq!(
        csv,
        "Full Name,Passport Number,Medical Fitness,Agent Name,Visa Status,Created At\n\"Doe, Jane\",P123,Pending,Alice,Approved,3/9/2024"
    );
}

#[test]
fn print_report_renders_escaped_table_with_money_amounts() {
    let entries = [entry("12.5", "<b>courier</b>")];
    let refs: Vec<&FinanceEntry> = entries.iter().collect();
    let report = PrintReport::new("Finance Ledger Report", ledger_print_rows(&refs))
        .generated_on(NaiveDate::from_ymd_opt(2024, 7, 4).unwrap());

    let html = report.render_html();
    assert!(html.contains("<h1>Finance Ledger Report</h1>"));
    assert!(html.contains("Generated on: 7/4/2024"));
    assert!(html.contains("<th>Date</th><th>Type</th><th>Category</th><th>Amount</th><th>Description</th>"));
    assert!(html.contains("<td>$12.50</td>"));
    assert!(html.contains("&lt;b&gt;courier&lt;/b&gt;"));
    assert!(!html.contains("<b>courier"));
}

#[test]
fn print_report_with_no_rows_still_renders_document() {
    let report = PrintReport::new("Empty", Vec::new());
    let html = report.render_html();
    assert!(html.contains("<tbody>\n</tbody>"));
    assert_eq!(report.file_name(), "empty.html");
}

#[test]
fn print_report_writes_slugged_html_file() {
    let dir = tempfile::tempdir().unwrap();
    let report = PrintReport::new("Finance Ledger Report", Vec::new());

    let path = report.write_to(dir.path()).unwrap();
    assert!(path.ends_with("finance-ledger-report.html"));
    assert!(std::fs::read_to_string(path).unwrap().starts_with("<html>"));
}
