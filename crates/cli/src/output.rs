//! Rendering command results as JSON on stdout.

use oakline_core::listing::ListOutcome;
use serde::Serialize;

use crate::error::CliError;

/// Pretty-print `value` to stdout.
///
/// # Errors
///
/// Returns error if the value cannot be serialized.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

/// A rendered list screen: the items plus an explanatory message when there
/// is nothing to show.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView<'a, T> {
    /// Matches before client-side pagination.
    pub matched: usize,
    pub items: Vec<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<'a, T> ListView<'a, T> {
    /// `noun` is the plural shown in messages, e.g. `"categories"`.
    pub fn new(outcome: ListOutcome<'a, T>, noun: &str) -> Self {
        match outcome {
            ListOutcome::Empty => Self {
                matched: 0,
                items: Vec::new(),
                message: Some(format!("No {noun} yet")),
            },
            ListOutcome::NoResults => Self {
                matched: 0,
                items: Vec::new(),
                message: Some(format!("No {noun} match the current search and filters")),
            },
            ListOutcome::Items { items, matched } => Self {
                matched,
                items,
                message: None,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_view_messages() {
        let empty: ListView<'_, u32> = ListView::new(ListOutcome::Empty, "orders");
        assert_eq!(empty.message.as_deref(), Some("No orders yet"));

        let none: ListView<'_, u32> = ListView::new(ListOutcome::NoResults, "orders");
        assert_eq!(
            none.message.as_deref(),
            Some("No orders match the current search and filters")
        );

        let value = 7_u32;
        let some = ListView::new(
            ListOutcome::Items {
                items: vec![&value],
                matched: 1,
            },
            "orders",
        );
        let json = serde_json::to_value(&some).unwrap();
        assert_eq!(json, serde_json::json!({"matched": 1, "items": [7]}));
    }
}
