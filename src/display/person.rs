//! Person and balance display formatting

use crate::models::Person;

/// Numbered list of people in registration order
pub fn format_people_list(people: &[Person]) -> String {
    if people.is_empty() {
        return "No people added yet.".to_string();
    }

    people
        .iter()
        .enumerate()
        .map(|(i, person)| format!("{}. {}\n", i + 1, person.display_name()))
        .collect()
}

/// Table of paid, owed and balance per person, in the order given
pub fn format_balance_list(people: &[&Person], currency: &str) -> String {
    if people.is_empty() {
        return "No people in ledger.".to_string();
    }

    let name_width = people
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>12}  {:>12}  {:>12}\n",
        "Name",
        "Paid",
        "Owed",
        "Balance",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->12}  {:->12}  {:->12}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for person in people {
        output.push_str(&format!(
            "{:<name_width$}  {:>12}  {:>12}  {:>12}\n",
            person.display_name(),
            person.paid.format_with_symbol(currency),
            person.owed.format_with_symbol(currency),
            person.balance.format_with_symbol(currency),
            name_width = name_width,
        ));
    }

    output
}
