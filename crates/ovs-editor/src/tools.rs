//! Pointer tool: the interaction state machine.
//!
//! Translates pointer events into `SceneMutation`s. The state itself is the
//! store's session-wide `InteractionMode`, so the tool only reads it:
//!
//! | Mode        | Down                         | Move                         | Up        |
//! |-------------|------------------------------|------------------------------|-----------|
//! | `Idle`      | select + drag/resize or clear|                              |           |
//! | `Placing`   | snap overlay to pointer      | snap overlay to pointer      | confirm   |
//! | `Dragging`  | restart as from `Idle`       | pointer − grab offset        | → `Idle`  |
//! | `Resizing`  | restart as from `Idle`       | pointer − top-left, floored  | → `Idle`  |

use crate::input::InputEvent;
use crate::mutation::SceneMutation;
use ovs_core::SceneStore;
use ovs_core::model::InteractionMode;
use ovs_render::hit::{Hit, HitPart};

/// The only canvas tool: select, place, drag and resize overlays.
#[derive(Debug, Default)]
pub struct PointerTool;

impl PointerTool {
    pub fn new() -> Self {
        Self
    }

    /// Handle an input event, returning zero or more mutations.
    ///
    /// `hit` is the hit-test result at the event position; it is only
    /// consulted on press.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        hit: Option<Hit>,
        scene: &SceneStore,
    ) -> Vec<SceneMutation> {
        match *event {
            InputEvent::PointerDown { x, y } => self.press(x, y, hit, scene),
            InputEvent::PointerMove { x, y } => self.drag(x, y, scene),
            InputEvent::PointerUp { .. } => {
                // Confirms a placement and ends any drag or resize.
                if scene.mode().is_idle() {
                    vec![]
                } else {
                    vec![SceneMutation::SetMode {
                        mode: InteractionMode::Idle,
                    }]
                }
            }
            InputEvent::Key { .. } => vec![],
        }
    }

    fn press(&self, x: f64, y: f64, hit: Option<Hit>, scene: &SceneStore) -> Vec<SceneMutation> {
        if let InteractionMode::Placing { id } = scene.mode() {
            return vec![SceneMutation::MoveOverlay { id, x, y }];
        }

        match hit {
            Some(Hit {
                id,
                part: HitPart::ResizeHandle,
            }) => vec![
                SceneMutation::Select { id: Some(id) },
                SceneMutation::SetMode {
                    mode: InteractionMode::Resizing { id },
                },
            ],
            Some(Hit {
                id,
                part: HitPart::Body,
            }) => {
                let Some(overlay) = scene.overlay(id) else {
                    return vec![];
                };
                vec![
                    SceneMutation::Select { id: Some(id) },
                    SceneMutation::SetMode {
                        mode: InteractionMode::Dragging {
                            id,
                            offset_x: x - overlay.x(),
                            offset_y: y - overlay.y(),
                        },
                    },
                ]
            }
            None => vec![
                SceneMutation::Select { id: None },
                SceneMutation::SetMode {
                    mode: InteractionMode::Idle,
                },
            ],
        }
    }

    fn drag(&self, x: f64, y: f64, scene: &SceneStore) -> Vec<SceneMutation> {
        match scene.mode() {
            InteractionMode::Idle => vec![],
            InteractionMode::Placing { id } => vec![SceneMutation::MoveOverlay { id, x, y }],
            InteractionMode::Dragging {
                id,
                offset_x,
                offset_y,
            } => vec![SceneMutation::MoveOverlay {
                id,
                x: x - offset_x,
                y: y - offset_y,
            }],
            InteractionMode::Resizing { id } => {
                let Some(overlay) = scene.overlay(id) else {
                    return vec![];
                };
                vec![SceneMutation::ResizeOverlay {
                    id,
                    width: x - overlay.x(),
                    height: y - overlay.y(),
                }]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovs_core::id::OverlayId;
    use ovs_core::{Color, DecodedImage, FontFamily, RgbaImage};

    fn body(id: OverlayId) -> Option<Hit> {
        Some(Hit {
            id,
            part: HitPart::Body,
        })
    }

    #[test]
    fn press_on_body_starts_drag_with_offset() {
        let mut scene = SceneStore::default();
        let id = scene
            .add_text_overlay("drag me", 20.0, FontFamily::Arial, Color::BLACK)
            .unwrap()
            .id();
        let mut tool = PointerTool::new();

        let mutations = tool.handle(&InputEvent::from_pointer_down(60.0, 55.0), body(id), &scene);
        assert_eq!(
            mutations,
            vec![
                SceneMutation::Select { id: Some(id) },
                SceneMutation::SetMode {
                    mode: InteractionMode::Dragging {
                        id,
                        offset_x: 10.0,
                        offset_y: 5.0
                    }
                },
            ]
        );
    }

    #[test]
    fn press_on_empty_canvas_clears() {
        let scene = SceneStore::default();
        let mut tool = PointerTool::new();
        let mutations = tool.handle(&InputEvent::from_pointer_down(1.0, 1.0), None, &scene);
        assert_eq!(
            mutations,
            vec![
                SceneMutation::Select { id: None },
                SceneMutation::SetMode {
                    mode: InteractionMode::Idle
                },
            ]
        );
    }

    #[test]
    fn placing_ignores_hits_and_snaps() {
        let mut scene = SceneStore::default();
        let id = scene
            .add_image_overlay(DecodedImage::new(RgbaImage::new(10, 10)), 200.0)
            .unwrap()
            .id();
        let mut tool = PointerTool::new();

        let down = tool.handle(&InputEvent::from_pointer_down(5.0, 6.0), body(id), &scene);
        assert_eq!(down, vec![SceneMutation::MoveOverlay { id, x: 5.0, y: 6.0 }]);

        let up = tool.handle(&InputEvent::from_pointer_up(5.0, 6.0), None, &scene);
        assert_eq!(
            up,
            vec![SceneMutation::SetMode {
                mode: InteractionMode::Idle
            }]
        );
    }

    #[test]
    fn idle_move_and_release_do_nothing() {
        let scene = SceneStore::default();
        let mut tool = PointerTool::new();
        assert!(
            tool.handle(&InputEvent::from_pointer_move(3.0, 3.0), None, &scene)
                .is_empty()
        );
        assert!(
            tool.handle(&InputEvent::from_pointer_up(3.0, 3.0), None, &scene)
                .is_empty()
        );
        assert!(tool.handle(&InputEvent::key("x"), None, &scene).is_empty());
    }
}
