//! CSV export of settlement transfers

use serde::Serialize;
use std::io::Write;

use crate::error::FairshareResult;
use crate::models::person::capitalize;
use crate::services::Transfer;

#[derive(Serialize)]
struct TransferRow {
    #[serde(rename = "From")]
    from: String,
    #[serde(rename = "To")]
    to: String,
    #[serde(rename = "Amount")]
    amount: String,
}

/// Export transfers to CSV, one row per transfer
pub fn export_transfers_csv<W: Write>(
    transfers: &[Transfer],
    writer: &mut W,
) -> FairshareResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    if transfers.is_empty() {
        csv_writer.write_record(["From", "To", "Amount"])?;
    }

    for transfer in transfers {
        csv_writer.serialize(TransferRow {
            from: capitalize(&transfer.from),
            to: capitalize(&transfer.to),
            amount: transfer.amount.to_string(),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_export_transfers_csv() {
        let transfers = vec![
            Transfer {
                from: "bob".into(),
                to: "alice".into(),
                amount: Money::from_cents(3600),
            },
            Transfer {
                from: "mary ann".into(),
                to: "alice".into(),
                amount: Money::from_cents(4800),
            },
        ];

        let mut buffer = Vec::new();
        export_transfers_csv(&transfers, &mut buffer).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "From,To,Amount\nBob,Alice,36.00\nMary ann,Alice,48.00\n"
        );
    }

    #[test]
    fn test_export_empty_has_header() {
        let mut buffer = Vec::new();
        export_transfers_csv(&[], &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "From,To,Amount\n");
    }
}
