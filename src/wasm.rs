//! WASM bindings for the run controller.
//!
//! The host owns the scheduling loop: it posts commands with `handle` and
//! calls `tick` from a timer, forwarding the returned events to the UI.
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { TspRunController } from 'tsp-anneal';
//!
//! await init();
//! const controller = new TspRunController();
//! controller.handle({ type: 'init', runId: 'run-1', algorithm: 'SA', points, startIndex: 0, settings }, performance.now());
//! const loop = () => {
//!     for (const event of controller.tick(performance.now())) {
//!         postMessage(event);
//!     }
//!     if (controller.is_running()) setTimeout(loop, 0);
//! };
//! loop();
//! ```

#![allow(clippy::must_use_candidate)]

use wasm_bindgen::prelude::*;

use crate::run::{Command, RunController};

/// Browser-facing wrapper over [`RunController`].
#[wasm_bindgen]
#[derive(Default)]
pub struct TspRunController {
    inner: RunController,
}

#[wasm_bindgen]
impl TspRunController {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one command message. Returns the reply event, or `null`.
    #[wasm_bindgen]
    pub fn handle(&mut self, message: JsValue, now_ms: f64) -> Result<JsValue, JsValue> {
        let command: Command = serde_wasm_bindgen::from_value(message)?;
        match self.inner.handle(command, now_ms) {
            Some(event) => Ok(serde_wasm_bindgen::to_value(&event)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// Runs one batch and returns the events it produced as an array.
    #[wasm_bindgen]
    pub fn tick(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        let events = self.inner.tick(now_ms);
        Ok(serde_wasm_bindgen::to_value(&events)?)
    }

    #[wasm_bindgen]
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    #[wasm_bindgen]
    pub fn is_paused(&self) -> bool {
        self.inner.is_paused()
    }

    /// Identifier of the active run, if any.
    #[wasm_bindgen(getter)]
    pub fn active_run(&self) -> Option<String> {
        self.inner.active_run().map(|id| id.as_str().to_string())
    }
}
