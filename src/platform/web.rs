//! Browser bindings

use glam::Vec2;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::StorageError;
use crate::game::GameSession;
use crate::input::{InputEvent, pick_piece};
use crate::settings::{InputModality, Settings};
use crate::sim::{BoardEvent, CircleWorld, PieceId};
use crate::store::{GameStateStore, StorageBackend};
use crate::tuning::Tuning;

/// `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)
    }
}

impl StorageBackend for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| StorageError::Unavailable)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| StorageError::Unavailable)
    }
}

/// Gear as handed to the JS renderer
#[derive(Serialize)]
struct PieceView {
    id: u32,
    x: f32,
    y: f32,
    radius: f32,
    rotation: f32,
    fixed: bool,
}

/// JS-facing game handle. The page forwards raw pointer coordinates (in
/// board units) and draws from `pieces_json`/`preview_json` each frame.
#[wasm_bindgen]
pub struct GearGame {
    session: GameSession<CircleWorld>,
    dragging: Option<PieceId>,
}

#[wasm_bindgen]
impl GearGame {
    #[wasm_bindgen(constructor)]
    pub fn new(touch_primary: bool) -> Result<GearGame, JsValue> {
        let mut settings = Settings::load(&LocalStorage);
        settings.modality = InputModality::from_touch_primary(touch_primary);
        settings.save(&mut LocalStorage);

        let store = GameStateStore::load(LocalStorage);
        let seed = js_sys::Date::now() as u64;
        let session = GameSession::with_circle_world(store, settings, Tuning::default(), seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self {
            session,
            dragging: None,
        })
    }

    /// Advance by `dt` seconds; returns the signal names raised
    /// (`"levelComplete"`, `"gameOver"`)
    pub fn frame(&mut self, dt: f32) -> js_sys::Array {
        let signals = js_sys::Array::new();
        for event in self.session.frame(dt) {
            let name = match event {
                BoardEvent::LevelComplete => "levelComplete",
                BoardEvent::GameOver => "gameOver",
            };
            signals.push(&JsValue::from_str(name));
        }
        signals
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        let pos = Vec2::new(x, y);
        match pick_piece(self.session.board(), pos) {
            Some(piece) => {
                self.session.handle_input(InputEvent::DragStart { piece, pos });
                if self.session.board().selected() == Some(piece) {
                    self.dragging = Some(piece);
                }
            }
            None => {
                self.session.handle_input(InputEvent::PointerDown(pos));
            }
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let pos = Vec2::new(x, y);
        let event = match self.dragging {
            Some(piece) => InputEvent::Drag { piece, pos },
            None => InputEvent::PointerMove(pos),
        };
        self.session.handle_input(event);
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) {
        let pos = Vec2::new(x, y);
        let event = match self.dragging.take() {
            Some(piece) => InputEvent::DragEnd { piece, pos },
            None => InputEvent::PointerUp(pos),
        };
        self.session.handle_input(event);
    }

    /// Next level after `levelComplete`
    pub fn advance(&mut self) -> Result<bool, JsValue> {
        self.dragging = None;
        self.session
            .advance()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Start over after `gameOver`
    pub fn retry(&mut self) -> Result<bool, JsValue> {
        self.dragging = None;
        self.session
            .retry()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn level(&self) -> u32 {
        self.session.hud().level
    }

    pub fn score(&self) -> f64 {
        self.session.hud().score as f64
    }

    pub fn gears_remaining(&self) -> u32 {
        self.session.hud().gears_remaining as u32
    }

    pub fn pieces_json(&self) -> String {
        let views: Vec<PieceView> = self
            .session
            .board()
            .pieces()
            .iter()
            .filter(|p| p.is_live())
            .map(|p| PieceView {
                id: p.id().0,
                x: p.pos().x,
                y: p.pos().y,
                radius: p.radius(),
                rotation: p.rotation(),
                fixed: p.is_fixed(),
            })
            .collect();
        serde_json::to_string(&views).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn preview_json(&self) -> String {
        let p = self.session.preview();
        serde_json::json!({
            "x": p.x,
            "y": p.y,
            "radius": p.radius,
            "visible": p.visible,
            "guide": p.guide,
        })
        .to_string()
    }
}

/// Install the panic hook and console logger
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Gear Chain starting...");
}
