use super::sheet::Sheet;
use crate::domain::Entrant;

/// Cross-tournament eligibility grid: names down column 1, one TRUE/FALSE column per tournament.
///
/// Rows are the union of entrant names in first-seen order. A tournament that did not
/// load an entrant leaves that cell empty.
pub fn eligibility_sheet<'a, I>(sheet_name: &str, tournaments: I) -> Sheet
where
    I: IntoIterator<Item = (&'a str, &'a [Entrant])>,
{
    let mut sheet = Sheet::new(sheet_name);
    let mut names: Vec<&str> = Vec::new();

    for (index, (tournament, entrants)) in tournaments.into_iter().enumerate() {
        let col = index + 2;
        sheet.set(1, col, tournament);
        for entrant in entrants {
            let position = match names.iter().position(|name| *name == entrant.name) {
                Some(position) => position,
                None => {
                    names.push(&entrant.name);
                    sheet.set(names.len() + 1, 1, entrant.name.as_str());
                    names.len() - 1
                }
            };
            sheet.set(position + 2, col, entrant.can_compete());
        }
    }
    sheet
}
