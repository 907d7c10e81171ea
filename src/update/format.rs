//! Formatting message handlers

use crate::commands::Cmd;
use crate::format;
use crate::messages::FormatMsg;
use crate::model::AppModel;

use super::settle;

/// Handle formatting messages
///
/// Commands that change nothing (unknown names, empty selections) produce no
/// command at all.
pub fn update_format(model: &mut AppModel, msg: FormatMsg) -> Option<Cmd> {
    let touched = match msg {
        FormatMsg::Apply(command) => {
            tracing::debug!(command = command.name(), "applying format command");
            command.apply(&mut model.document, &mut model.context)
        }
        FormatMsg::ApplyNamed { name, value } => format::apply_named(
            &mut model.document,
            &mut model.context,
            &name,
            value.as_deref(),
        ),
        FormatMsg::ClearFormat => format::clear_format(&mut model.document, &mut model.context),
    };
    settle(model, &touched)
}
