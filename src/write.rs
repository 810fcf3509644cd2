use std::{io, path::Path};

use crate::parse::MunicipalityRecord;
use crate::Result;

const HEADER: [&str; 6] = [
    "code",
    "name",
    "registered_voters",
    "issued_envelopes",
    "valid_votes",
    "party_votes",
];

/// Writes the records to `path` as CSV, replacing any existing file.
pub(crate) fn save_to_csv(records: &[MunicipalityRecord], path: impl AsRef<Path>) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    write_records(records, &mut wtr)?;
    wtr.flush()?;
    Ok(())
}

/// One header line, then one line per record in input order.
/// All party counts of a row land in the single `party_votes` column;
/// the schema stays the same no matter how many parties ran.
fn write_records<W: io::Write>(
    records: &[MunicipalityRecord],
    wtr: &mut csv::Writer<W>,
) -> Result<()> {
    wtr.write_record(HEADER)?;

    for rec in records {
        let registered = rec.registered_voters.to_string();
        let issued = rec.issued_envelopes.to_string();
        let valid = rec.valid_votes.to_string();
        let parties = fmt_party_votes(&rec.party_votes);

        wtr.write_record([
            rec.code.as_str(),
            rec.name.as_str(),
            registered.as_str(),
            issued.as_str(),
            valid.as_str(),
            parties.as_str(),
        ])?;
    }

    Ok(())
}

/// Renders the party mapping as `{Party A: 400, Party B: 390}`.
/// The csv writer quotes the field, so the embedded commas are safe.
fn fmt_party_votes(party_votes: &[(String, u64)]) -> String {
    let body = party_votes
        .iter()
        .map(|(name, votes)| format!("{name}: {votes}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{body}}}")
}
