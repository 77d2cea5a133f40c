//! Demo sequence shared by the `clientbook` binary and its tests.
//!
//! # Responsibility
//! - Walk one client through create, search, update, phone delete and delete.
//! - Write every search result to the given sink as JSON lines.

use clientbook_core::{
    ClientFilter, ClientPatch, ClientRepository, ClientRow, ClientService, NewClient, PhoneUpdate,
};
use std::error::Error;
use std::io::Write;

/// Runs the demo against any repository, writing search output to `out`.
///
/// The demo client is deleted again before returning, so a successful run
/// leaves the directory as it found it.
pub fn run_demo<R, W>(service: &mut ClientService<R>, out: &mut W) -> Result<(), Box<dyn Error>>
where
    R: ClientRepository,
    W: Write,
{
    let client_id = service.create_client(
        &NewClient::new("Иван", "Иванов", "ivanov@example.com")
            .with_phones(["123456789", "987654321"]),
    )?;

    write_rows(
        out,
        "Search by first name:",
        &service.find_clients(&ClientFilter::by_first_name("Иван"))?,
    )?;

    service.update_client(
        client_id,
        &ClientPatch {
            email: Some("ivanov_new@example.com".to_string()),
            phones: PhoneUpdate::replace(["111222333"]),
            ..ClientPatch::default()
        },
    )?;

    let by_new_email = ClientFilter::by_email("ivanov_new@example.com");
    write_rows(out, "Search after update:", &service.find_clients(&by_new_email)?)?;

    service.delete_phone(client_id, "111222333")?;
    write_rows(
        out,
        "Search after phone delete:",
        &service.find_clients(&by_new_email)?,
    )?;

    service.delete_client(client_id)?;
    write_rows(
        out,
        "Search after client delete:",
        &service.find_clients(&by_new_email)?,
    )?;

    Ok(())
}

fn write_rows<W: Write>(
    out: &mut W,
    title: &str,
    rows: &[ClientRow],
) -> Result<(), Box<dyn Error>> {
    writeln!(out, "{title}")?;
    if rows.is_empty() {
        writeln!(out, "  (no rows)")?;
    }
    for row in rows {
        writeln!(out, "  {}", serde_json::to_string(row)?)?;
    }
    Ok(())
}
