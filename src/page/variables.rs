//! Variable inspector rendering.

use crate::execution::Bindings;

pub const NO_VARIABLES: &str = "(no variables)";

/// One `name = value` line per binding, in the order given.
pub fn render(bindings: &Bindings) -> String {
    if bindings.is_empty() {
        return NO_VARIABLES.to_string();
    }
    bindings
        .iter()
        .map(|(name, value)| format!("{name} = {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
