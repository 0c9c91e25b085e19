//! Cartesian expansion of a [`ParameterSpec`]

use crate::spec::{Configuration, ParameterSpec};

/// Expand a spec into every concrete configuration
///
/// The last parameter varies fastest. A spec without parameters yields no
/// configurations, and so does a spec with any empty candidate list.
pub fn cartesian(spec: &ParameterSpec) -> Vec<Configuration> {
    if spec.is_empty() {
        return Vec::new();
    }

    let mut combos = vec![Configuration::new()];
    for param in spec.parameters() {
        let mut next = Vec::with_capacity(combos.len() * param.values.len());
        for partial in &combos {
            for value in &param.values {
                let mut config = partial.clone();
                config.set(&param.name, value.clone());
                next.push(config);
            }
        }
        combos = next;
    }

    tracing::debug!(
        parameters = spec.len(),
        combinations = combos.len(),
        "Expanded parameter spec"
    );
    combos
}
