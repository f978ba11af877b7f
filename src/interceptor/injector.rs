use super::MaterializedField;
use crate::wrapper::{AssignmentClause, ConditionClause, UpdateClause};
use tracing::{Level, event};

/// Bind each materialized value under a fresh `<prefix><n>` name and append
/// `column = <placeholder>` after the caller's own assignments.
///
/// Fields without a value are skipped. Names already bound in the wrapper are
/// never reused. Returns the parameter names that were registered.
///
/// The counter advances only for injected values, so a field left unfilled
/// does not leave a gap in the `<prefix><n>` sequence.
pub fn inject(
    wrapper: &mut dyn UpdateClause,
    fields: &[MaterializedField<'_>],
    param_prefix: &str,
) -> Vec<String> {
    let mut injected = Vec::new();
    let mut seq = 0usize;

    for materialized in fields {
        let Some(value) = &materialized.value else {
            continue;
        };

        let param_name = loop {
            let candidate = format!("{}{}", param_prefix, seq);
            seq += 1;
            if !wrapper.param_name_value_pairs().contains_key(&candidate) {
                break candidate;
            }
        };

        let column = &materialized.field.column;
        let fragment = format!("{} = {}", column, wrapper.placeholder(&param_name));
        wrapper
            .param_name_value_pairs_mut()
            .insert(param_name.clone(), value.clone());
        wrapper.append_set_sql(&fragment);

        event!(Level::DEBUG, column = %column, param = %param_name, "auto-fill assignment injected");
        injected.push(param_name);
    }

    injected
}
