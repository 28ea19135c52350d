//! Presentation layer: actor outlines and the status HUD.
//!
//! | Element        | Source                               | Update               |
//! |----------------|--------------------------------------|----------------------|
//! | Actor outline  | `Presentation` + `GlobalTransform`   | every frame (gizmos) |
//! | Status HUD     | `PlayerStatus` resource              | when it changes      |
//!
//! Nothing here writes simulation state; the core only exposes plain fields
//! for this module to poll.

use crate::actor::Presentation;
use crate::config::GameConfig;
use crate::player::PlayerStatus;
use bevy::prelude::*;

/// Marker for the HUD text root.
#[derive(Component)]
pub struct HudStatusDisplay;

/// Draw every actor with a [`Presentation`] as a circle scaled by its
/// transform.  Ethereal actors get a second, fainter ring.
pub fn gizmo_rendering_system(
    mut gizmos: Gizmos,
    query: Query<(&Presentation, &GlobalTransform)>,
) {
    for (presentation, transform) in query.iter() {
        let (scale, _, translation) = transform.to_scale_rotation_translation();
        let radius = presentation.radius * scale.x.abs().max(f32::EPSILON);
        let center = translation.truncate();
        gizmos.circle_2d(center, radius, presentation.color());
        if presentation.ethereal && presentation.alpha > 0.0 {
            let faint = presentation.color().with_alpha(presentation.alpha * 0.35);
            gizmos.circle_2d(center, radius * 0.6, faint);
        }
    }
}

/// HUD line for the current status.
pub fn status_line(status: &PlayerStatus) -> String {
    if status.is_dead() {
        format!("DESTROYED   Score: {}", status.score)
    } else {
        format!(
            "Shield: {}/{}   Ammo: {}/{}   Score: {}",
            status.hp.max(0),
            status.max_hp,
            status.ammo,
            status.max_ammo,
            status.score
        )
    }
}

pub fn setup_hud(mut commands: Commands, config: Res<GameConfig>, status: Res<PlayerStatus>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            HudStatusDisplay,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(status_line(&status)),
                TextFont {
                    font_size: config.hud_font_size,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.88, 0.45)),
            ));
        });
}

/// Rewrite the HUD text whenever [`PlayerStatus`] changes.
pub fn hud_status_display_system(
    status: Res<PlayerStatus>,
    parent_query: Query<&Children, With<HudStatusDisplay>>,
    mut text_query: Query<&mut Text>,
) {
    if !status.is_changed() {
        return;
    }
    for children in parent_query.iter() {
        for child in children.iter() {
            if let Ok(mut text) = text_query.get_mut(child) {
                *text = Text::new(status_line(&status));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_shows_all_counters() {
        let status = PlayerStatus {
            ammo: 3,
            score: 12,
            ..PlayerStatus::default()
        };
        assert_eq!(status_line(&status), "Shield: 5/5   Ammo: 3/5   Score: 12");
    }

    #[test]
    fn status_line_reports_death() {
        let status = PlayerStatus {
            hp: -1,
            score: 40,
            ..PlayerStatus::default()
        };
        assert_eq!(status_line(&status), "DESTROYED   Score: 40");
    }
}
