use serde_json::Value;

use benford_core::reference;

/// The Benford first-digit table, tabulated and exact.
pub fn run_reference() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(reference::reference_table())?)
}
