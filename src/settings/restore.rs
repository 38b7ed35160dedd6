use crate::filter::controller::FilterParameterController;
use crate::filter::error::FilterError;
use crate::filter::types::{FilterKind, NormalizedValue, ParameterUpdateEvent};
use crate::settings::store::SettingsStore;
use crate::settings::types::FilterSettings;

/// Apply saved slider positions and the enable switch to a controller.
///
/// Kinds are applied in slider order. Unknown ids and invalid positions are
/// logged and skipped. Returns the `(kind, native value)` pairs written.
pub fn apply_saved_settings(
    controller: &mut FilterParameterController,
    settings: &FilterSettings,
) -> Vec<(FilterKind, f32)> {
    for id in settings.positions.keys() {
        if let Err(e) = id.parse::<FilterKind>() {
            tracing::warn!("Skipping saved setting: {e}");
        }
    }

    let mut applied = Vec::new();
    for kind in FilterKind::ALL {
        let Some(&position) = settings.positions.get(kind.as_id_str()) else {
            continue;
        };
        match controller.apply(kind, position) {
            Ok(native) => applied.push((kind, native)),
            Err(e) => tracing::warn!("Failed to restore '{kind}' = {position}: {e}"),
        }
    }

    controller.set_enabled(settings.enabled);
    applied
}

/// Snapshot a controller's state in the saved-settings form.
pub fn capture_settings(controller: &FilterParameterController) -> FilterSettings {
    let positions = FilterKind::ALL
        .iter()
        .filter_map(|&kind| {
            controller
                .normalized(kind)
                .ok()
                .map(|v| (kind.as_id_str().to_string(), v))
        })
        .collect();
    FilterSettings {
        enabled: controller.is_enabled(),
        positions,
    }
}

/// Handle a slider event from the UI: update the chain, then remember the
/// position.
pub fn apply_and_persist(
    controller: &mut FilterParameterController,
    store: &SettingsStore,
    event: &ParameterUpdateEvent,
) -> Result<f32, FilterError> {
    let native = controller.apply_event(event)?;
    store.set_position(event.kind, NormalizedValue::new(event.value)?);
    Ok(native)
}

/// Handle the enable switch from the UI: rewire the chain, then remember it.
pub fn set_enabled_and_persist(
    controller: &mut FilterParameterController,
    store: &SettingsStore,
    enabled: bool,
) {
    controller.set_enabled(enabled);
    store.set_enabled(enabled);
}
