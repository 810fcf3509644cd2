use scraper::{ElementRef, Html, Selector};

use crate::{Error, Result};

/// One row of the results table: the vote counts of a single municipality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MunicipalityRecord {
    pub code: String,
    pub name: String,
    pub registered_voters: u64,
    pub issued_envelopes: u64,
    pub valid_votes: u64,
    /// Party name -> vote count, in the order the party columns appear on the page.
    pub party_votes: Vec<(String, u64)>,
}

/// Extracts all municipality rows from a results page.
/// A page without a results table yields an empty `Vec`, not an error.
pub(crate) fn parse_results(html: &str) -> Result<Vec<MunicipalityRecord>> {
    let doc = Html::parse_document(html);

    // Create selectors.
    let table_selector = create_selector("table.list")?;
    let row_selector = create_selector("tr")?;
    let cell_selector = create_selector("td")?;

    let Some(table) = doc.select(&table_selector).next() else {
        return Ok(Vec::new());
    };

    let mut records = Vec::new();
    // The first two rows are the header and sub-header.
    for row in table.select(&row_selector).skip(2) {
        let cells = row
            .select(&cell_selector)
            .map(cell_text)
            .collect::<Vec<_>>();
        // Spacer and note rows don't carry the full set of columns; skip them.
        if cells.len() < 7 {
            continue;
        }

        let mut party_votes = Vec::with_capacity(cells.len() - 5);
        for cell in &cells[5..] {
            if let Some(entry) = parse_party_cell(cell)? {
                party_votes.push(entry);
            }
        }

        records.push(MunicipalityRecord {
            code: cells[0].clone(),
            name: cells[1].clone(),
            registered_voters: parse_count(&cells[2])?,
            issued_envelopes: parse_count(&cells[3])?,
            valid_votes: parse_count(&cells[4])?,
            party_votes,
        });
    }

    Ok(records)
}

/// Concatenates the text nodes of a cell and trims the result.
fn cell_text(td: ElementRef) -> String {
    td.text().collect::<String>().trim().to_string()
}

/// Parses a vote count, dropping the thousands separators the site inserts
/// (non-breaking or plain spaces): `"1 234"` and `"1\u{a0}234"` are both 1234.
fn parse_count(cell: &str) -> Result<u64> {
    let digits = cell.replace(['\u{a0}', ' '], "");
    digits.parse().map_err(|source| Error::MalformedNumber {
        cell: cell.to_string(),
        source,
    })
}

/// Splits a party cell into `(party name, vote count)`.
/// Name and count share one text node, and the count itself may carry
/// thousands separators, so the maximal trailing run of digit-only tokens is
/// taken as the count and everything before it as the name. A name made
/// purely of numeric tokens would misparse; the source pages never produce
/// one. An empty cell yields `None`.
fn parse_party_cell(cell: &str) -> Result<Option<(String, u64)>> {
    let text = cell.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let mut tokens = text.split_whitespace().collect::<Vec<_>>();
    let mut count_start = tokens.len();
    while count_start > 0 && tokens[count_start - 1].bytes().all(|b| b.is_ascii_digit()) {
        count_start -= 1;
    }

    let count = tokens.split_off(count_start).join(" ");
    // A cell with no trailing digits has no count; fails the parse below.
    let votes = parse_count(if count.is_empty() { text } else { count.as_str() })?;
    let name = tokens.join(" ");

    Ok(Some((name, votes)))
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(rows: &str) -> String {
        format!(
            r#"<html><body>
            <table class="list">
            <tr><th>Obec</th><th>Voliči</th></tr>
            <tr><th></th><th></th></tr>
            {rows}
            </table>
            </body></html>"#
        )
    }

    #[test]
    fn single_row_extracts_one_record() {
        let html = page(
            "<tr><td>500101</td><td>Testville</td><td>1000</td><td>800</td><td>790</td>\
             <td>Party A 400</td><td>Party B 390</td></tr>",
        );
        let records = parse_results(&html).unwrap();

        assert_eq!(
            records,
            vec![MunicipalityRecord {
                code: "500101".to_string(),
                name: "Testville".to_string(),
                registered_voters: 1000,
                issued_envelopes: 800,
                valid_votes: 790,
                party_votes: vec![
                    ("Party A".to_string(), 400),
                    ("Party B".to_string(), 390)
                ],
            }]
        );
    }

    #[test]
    fn page_without_results_table_yields_nothing() {
        let html = "<html><body><table><tr><td>unrelated</td></tr></table></body></html>";
        assert!(parse_results(html).unwrap().is_empty());
    }

    #[test]
    fn short_rows_are_skipped_silently() {
        let html = page(
            "<tr><td>1</td><td>Five-cell row</td><td>1</td><td>1</td><td>1</td></tr>\
             <tr><td>500101</td><td>Kept</td><td>10</td><td>8</td><td>7</td>\
             <td>A 4</td><td>B 3</td></tr>",
        );
        let records = parse_results(&html).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Kept");
    }

    #[test]
    fn separators_in_counts_are_stripped() {
        // The site renders thousands separators as &nbsp; but plain spaces show up too.
        assert_eq!(parse_count("1 234").unwrap(), 1234);
        assert_eq!(parse_count("1\u{a0}234").unwrap(), 1234);
        assert_eq!(parse_count("42").unwrap(), 42);
    }

    #[test]
    fn nbsp_separators_survive_the_full_row_path() {
        let html = page(
            "<tr><td>500102</td><td>Nbspville</td><td>1&#160;234</td><td>1&#160;000</td>\
             <td>990</td><td>A 900</td><td>B 90</td></tr>",
        );
        let records = parse_results(&html).unwrap();

        assert_eq!(records[0].registered_voters, 1234);
        assert_eq!(records[0].issued_envelopes, 1000);
    }

    #[test]
    fn party_name_keeps_internal_whitespace() {
        let (name, votes) = parse_party_cell("Strana X 1 234").unwrap().unwrap();
        assert_eq!(name, "Strana X");
        assert_eq!(votes, 1234);
    }

    #[test]
    fn separated_count_in_party_cell_survives_the_full_row_path() {
        let html = page(
            "<tr><td>500105</td><td>Splitville</td><td>10</td><td>8</td><td>7</td>\
             <td>Strana X 1&#160;234</td><td>B 3</td></tr>",
        );
        let records = parse_results(&html).unwrap();

        assert_eq!(
            records[0].party_votes,
            vec![("Strana X".to_string(), 1234), ("B".to_string(), 3)]
        );
    }

    #[test]
    fn party_cell_without_trailing_count_is_malformed() {
        let err = parse_party_cell("Strana X").unwrap_err();
        assert!(matches!(err, Error::MalformedNumber { cell, .. } if cell == "Strana X"));
    }

    #[test]
    fn all_numeric_party_cell_parses_as_nameless_count() {
        // Accepted limitation of the trailing-digit-run heuristic.
        let (name, votes) = parse_party_cell("123 456").unwrap().unwrap();
        assert_eq!(name, "");
        assert_eq!(votes, 123456);
    }

    #[test]
    fn empty_party_cell_adds_no_entry() {
        assert_eq!(parse_party_cell("").unwrap(), None);
        assert_eq!(parse_party_cell("   ").unwrap(), None);

        let html = page(
            "<tr><td>500103</td><td>Gapville</td><td>10</td><td>8</td><td>7</td>\
             <td></td><td>B 7</td></tr>",
        );
        let records = parse_results(&html).unwrap();
        assert_eq!(records[0].party_votes, vec![("B".to_string(), 7)]);
    }

    #[test]
    fn malformed_count_aborts_the_run() {
        let html = page(
            "<tr><td>500104</td><td>Badville</td><td>not-a-number</td><td>8</td><td>7</td>\
             <td>A 4</td><td>B 3</td></tr>",
        );
        let err = parse_results(&html).unwrap_err();
        assert!(matches!(err, Error::MalformedNumber { cell, .. } if cell == "not-a-number"));
    }
}
