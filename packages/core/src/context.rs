// ABOUTME: Renders intake progress into the system prompt
// ABOUTME: Deterministic text built fresh from the current info and completion flags

use crate::constants::BASE_SYSTEM_PROMPT;
use crate::progress::Progress;
use crate::types::Field;

/// Render the progress block appended to the base instruction.
///
/// Output depends only on the collected info and flags.
pub fn render_progress(progress: &Progress<'_>) -> String {
    let mut block = format!(
        "INFORMACIÓN RECOPILADA ({}/{}):\n",
        progress.completed_count(),
        progress.total()
    );

    for field in Field::ALL {
        if progress.status().is_done(field) {
            block.push_str(&format!(
                "✓ {}: {}\n",
                field.label(),
                progress.info().get(field)
            ));
        } else {
            block.push_str(&format!("○ {}: pendiente\n", field.label()));
        }
    }

    block.push('\n');
    match progress.next_pending() {
        Some(field) => block.push_str(&format!(
            "INSTRUCCIÓN: Pregunta de forma natural {}.",
            field.prompt_hint()
        )),
        None => block.push_str(
            "INSTRUCCIÓN: Ya tienes toda la información. \
             Confirma con el usuario los datos recopilados.",
        ),
    }

    block
}

/// Full system message: base instruction followed by the progress block
pub fn build_system_prompt(progress: &Progress<'_>) -> String {
    format!("{}\n\n{}", BASE_SYSTEM_PROMPT, render_progress(progress))
}
