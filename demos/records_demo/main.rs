//! Tabsync demo - faculty research records
//!
//! This demo walks the full client/server stack in one process:
//! - Hosting the dataset catalog on the in-memory record server
//! - Wiring a dataset controller to it over the loopback HTTP path
//! - The edit lifecycle: add, edit, save, cancel, delete
//! - Bulk import from tabular text and export back out
//!
//! Run with: cargo run -p records_demo

use std::sync::Arc;
use tabsync_core::{DatasetConfig, DatasetController};
use tabsync_gateway::{HttpGateway, HttpRequest, HttpResponse, LoopbackClient, LoopbackServer};
use tabsync_model::{datasets, FieldValue, RowDraft};
use tabsync_server::{RecordServer, ServerConfig};

/// Routes gateway requests straight to the in-process server.
struct InProcessServer {
    server: Arc<RecordServer>,
}

impl LoopbackServer for InProcessServer {
    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let start = request.url.find("/records").unwrap_or(0);
        let (path, query) = request.url[start..]
            .split_once('?')
            .unwrap_or((&request.url[start..], ""));

        let (status, body) = self.server.handle_request(
            request.method.as_str(),
            path,
            query,
            request.body.as_deref().unwrap_or(""),
        );
        HttpResponse::with_status(status, body)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Host every catalog dataset and seed one journal entry.
    let server = Arc::new(RecordServer::with_datasets(
        ServerConfig::default(),
        datasets::all(),
    ));
    server
        .seed(
            "journals",
            vec![RowDraft::new()
                .with("authorName", FieldValue::Text("A. Lovelace".into()))
                .with("paperTitle", FieldValue::Text("Notes on the Engine".into()))
                .with("journalName", FieldValue::Text("Proceedings".into()))
                .with("doi", FieldValue::Text("10.1/engine".into()))
                .with("year", FieldValue::Number(2019.0))],
        )
        .expect("seeding should succeed");

    // One controller per dataset screen; journals here.
    let client = LoopbackClient::new(InProcessServer {
        server: Arc::clone(&server),
    });
    let gateway = HttpGateway::new(
        "https://records.local/records/journals",
        Arc::new(datasets::journals()),
        client,
    );
    let journals = DatasetController::new(
        Arc::new(datasets::journals()),
        DatasetConfig::new(),
        gateway,
    );

    journals.refresh().expect("initial fetch should succeed");
    print_rows("after mount", &journals);

    // Add a row, fill it in, save. The provisional id never reaches
    // the server; the reload swaps in the persisted row.
    let id = journals.add_row();
    println!("editing provisional row {id}");
    journals.update_field(&id, "authorName", "G. Hopper");
    journals.update_field(&id, "paperTitle", "The Education of a Computer");
    journals.update_field(&id, "journalName", "Proceedings of the ACM");
    journals.update_field(&id, "doi", "10.1/education");
    journals.update_field(&id, "year", "2024");
    journals.save().expect("save should succeed");
    print_rows("after save", &journals);

    // Abandon an edit; the reload restores server truth.
    let scratch = journals.add_row();
    journals.update_field(&scratch, "paperTitle", "Never saved");
    journals.cancel().expect("cancel should succeed");
    print_rows("after cancel", &journals);

    // Bulk import, then export what the server confirmed.
    let imported = journals
        .import_csv(
            "paperTitle,journalName,doi,year\n\
             On Computable Numbers,Proc. LMS,10.1/computable,2021\n\
             A Mathematical Theory,BSTJ,10.1/information,2022",
        )
        .expect("import should succeed");
    println!("imported {imported} rows");
    print_rows("after import", &journals);

    println!("\nexport:\n{}", journals.export_csv());

    let stats = journals.stats();
    println!(
        "\nstats: {} fetches, {} saves, {} imports",
        stats.fetches, stats.saves, stats.imports
    );
}

fn print_rows<G: tabsync_gateway::SyncGateway>(label: &str, ctl: &DatasetController<G>) {
    println!("\n{label}: {} rows", ctl.rows().len());
    for row in ctl.rows() {
        let title = row.get("paperTitle").map(|v| v.to_display()).unwrap_or_default();
        let year = row.get("year").map(|v| v.to_display()).unwrap_or_default();
        println!("  [{year}] {title} ({})", row.id);
    }
}
