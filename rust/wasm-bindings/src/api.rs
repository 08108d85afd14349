// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JavaScript API for the structural viewer

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use js_sys::{Function, Promise};
use serde::Serialize;
use structview_viewer::{
    Error as ViewerError, PointerButton, RenderLoop, ViewMode, Viewer, ViewerConfig,
};
use tracing::Level;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, HtmlElement, PointerEvent, Response, WheelEvent,
};

use crate::backend::{JsBackend, JsRenderer};
use crate::logging;
use crate::scheduler::AnimationFrameScheduler;
use crate::utils::{element_size, local_point, set_prop, window};

type SharedViewer = Rc<RefCell<Viewer<JsBackend>>>;
type EventCallback = Rc<RefCell<Option<Function>>>;

/// Pixels per line for wheel events reported in lines
const WHEEL_LINE_HEIGHT: f64 = 16.0;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Structural model viewer bound to a container element
///
/// Drawing is delegated to `renderer`; pointer, wheel and resize input is
/// read from the container and the window.
#[wasm_bindgen]
pub struct StructureViewer {
    viewer: SharedViewer,
    render_loop: Rc<RefCell<RenderLoop<AnimationFrameScheduler>>>,
    on_event: EventCallback,
    container: HtmlElement,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl StructureViewer {
    /// Create a viewer. `config_json` overrides any subset of the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        renderer: JsRenderer,
        config_json: Option<String>,
    ) -> Result<StructureViewer, JsError> {
        logging::install(Level::INFO);

        let config = match config_json.as_deref() {
            Some(json) => ViewerConfig::from_json(json)
                .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?,
            None => ViewerConfig::default(),
        };
        let window = window()?;

        let mut viewer = Viewer::new(JsBackend::new(renderer), config)
            .map_err(|e| JsError::new(&format!("Failed to create viewer: {}", e)))?;
        let (width, height) = element_size(&container);
        viewer.handle_resize(width.max(1), height.max(1))?;

        let mut this = StructureViewer {
            viewer: Rc::new(RefCell::new(viewer)),
            render_loop: Rc::new(RefCell::new(RenderLoop::new(
                AnimationFrameScheduler::new(window.clone()),
            ))),
            on_event: Rc::new(RefCell::new(None)),
            container,
            listeners: Vec::new(),
        };
        this.start_render_loop();
        this.attach_listeners(&window)?;
        Ok(this)
    }

    /// Render a model given as a JSON string or a plain object
    pub fn render(&mut self, model: JsValue) -> Result<JsValue, JsError> {
        let json = match model.as_string() {
            Some(json) => json,
            None => js_sys::JSON::stringify(&model)
                .map(String::from)
                .map_err(|_| JsError::new("Model is not JSON-serializable"))?,
        };
        self.render_json(&json)
    }

    /// Render a model from JSON text. Returns a report with story names,
    /// build statistics and skipped elements.
    #[wasm_bindgen(js_name = renderJson)]
    pub fn render_json(&mut self, json: &str) -> Result<JsValue, JsError> {
        let report = self.viewer.borrow_mut().render_json(json);
        self.dispatch_events();
        to_js(&report?)
    }

    #[wasm_bindgen(js_name = clearModel)]
    pub fn clear_model(&mut self) -> Result<(), JsError> {
        self.viewer.borrow_mut().clear_model()?;
        self.dispatch_events();
        Ok(())
    }

    #[wasm_bindgen(getter, js_name = hasModel)]
    pub fn has_model(&self) -> bool {
        self.viewer.borrow().has_model()
    }

    /// Re-read the container size
    #[wasm_bindgen(js_name = handleResize)]
    pub fn handle_resize(&self) -> Result<(), JsError> {
        resize_to(&self.viewer, &self.container)?;
        Ok(())
    }

    /// Resize to the container once the layout settles after a fullscreen
    /// change. Resolves when the resize has happened.
    #[wasm_bindgen(js_name = fullscreenChanged)]
    pub fn fullscreen_changed(&self) -> Promise {
        let viewer = Rc::downgrade(&self.viewer);
        let container = self.container.clone();
        let delay = self.viewer.borrow().config().resize_settle_ms;

        Promise::new(&mut |resolve, _reject| {
            let viewer = viewer.clone();
            let container = container.clone();
            spawn_local(async move {
                settle_then_resize(viewer, container, delay).await;
                let _ = resolve.call0(&JsValue::NULL);
            });
        })
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&self) -> Result<(), JsError> {
        self.viewer.borrow_mut().reset_view()?;
        Ok(())
    }

    /// Move the camera to a preset: top, bottom, front, back, left, side
    /// (or right) and iso
    #[wasm_bindgen(js_name = setView)]
    pub fn set_view(&self, preset: &str) -> Result<(), JsError> {
        self.viewer.borrow_mut().set_view(preset)?;
        Ok(())
    }

    /// Show only the named stories. Unknown names are ignored.
    #[wasm_bindgen(js_name = filterStories)]
    pub fn filter_stories(&self, names: Vec<String>) -> Result<(), JsError> {
        let result = self.viewer.borrow_mut().filter_stories(&names);
        self.dispatch_events();
        Ok(result?)
    }

    /// Flip one story's visibility; returns the new state
    #[wasm_bindgen(js_name = toggleStory)]
    pub fn toggle_story(&self, name: &str) -> Result<bool, JsError> {
        let result = self.viewer.borrow_mut().toggle_story(name);
        self.dispatch_events();
        Ok(result?)
    }

    #[wasm_bindgen(js_name = storyNames)]
    pub fn story_names(&self) -> Result<Vec<String>, JsError> {
        Ok(self.viewer.borrow().story_names()?)
    }

    #[wasm_bindgen(js_name = visibleStories)]
    pub fn visible_stories(&self) -> Result<Vec<String>, JsError> {
        Ok(self.viewer.borrow().visible_stories()?)
    }

    /// Stories with their element names grouped by category
    #[wasm_bindgen(js_name = elementTree)]
    pub fn element_tree(&self) -> Result<JsValue, JsError> {
        let tree = self.viewer.borrow().element_tree()?;
        to_js(&tree)
    }

    #[wasm_bindgen(js_name = viewMode)]
    pub fn view_mode(&self) -> Result<String, JsError> {
        Ok(self.viewer.borrow().view_mode()?.to_string())
    }

    /// Switch to "3d" or "2d"
    #[wasm_bindgen(js_name = setViewMode)]
    pub fn set_view_mode(&self, mode: &str) -> Result<(), JsError> {
        let mode = ViewMode::from_str(mode)?;
        let result = self.viewer.borrow_mut().set_view_mode(mode);
        self.dispatch_events();
        Ok(result?)
    }

    #[wasm_bindgen(js_name = toggleViewMode)]
    pub fn toggle_view_mode(&self) -> Result<String, JsError> {
        let result = self.viewer.borrow_mut().toggle_view_mode();
        self.dispatch_events();
        Ok(result?.to_string())
    }

    /// Recolor stories from a `{ storyName: "#rrggbb" }` map. `null` or
    /// `undefined` restores the default category colors.
    #[wasm_bindgen(js_name = updateMaterialColors)]
    pub fn update_material_colors(&self, colors: JsValue) -> Result<(), JsError> {
        let colors: Option<BTreeMap<String, String>> = if colors.is_null() || colors.is_undefined()
        {
            None
        } else {
            Some(
                serde_wasm_bindgen::from_value(colors)
                    .map_err(|e| JsError::new(&format!("Invalid color map: {}", e)))?,
            )
        };
        self.viewer
            .borrow_mut()
            .update_material_colors(colors.as_ref())?;
        Ok(())
    }

    /// Select an element by its display name, e.g. "Column_C1"
    #[wasm_bindgen(js_name = selectElementByName)]
    pub fn select_element_by_name(&self, name: &str) -> Result<(), JsError> {
        let result = self.viewer.borrow_mut().select_element_by_name(name);
        self.dispatch_events();
        Ok(result?)
    }

    #[wasm_bindgen(js_name = selectElementInStory)]
    pub fn select_element_in_story(&self, story: &str, name: &str) -> Result<(), JsError> {
        let result = self.viewer.borrow_mut().select_element_in_story(story, name);
        self.dispatch_events();
        Ok(result?)
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&self) -> Result<bool, JsError> {
        let result = self.viewer.borrow_mut().clear_selection();
        self.dispatch_events();
        Ok(result?)
    }

    /// `{ story, name }` of the selected element, or `null`
    pub fn selected(&self) -> JsValue {
        match self.viewer.borrow().selected() {
            Some((story, name)) => {
                let obj: JsValue = js_sys::Object::new().into();
                set_prop(&obj, "story", &JsValue::from_str(&story));
                set_prop(&obj, "name", &JsValue::from_str(&name));
                obj
            }
            None => JsValue::NULL,
        }
    }

    /// Name of the element under a container-local point, without
    /// changing the selection
    #[wasm_bindgen(js_name = pickAt)]
    pub fn pick_at(&self, x: f64, y: f64) -> Result<Option<String>, JsError> {
        let hit = self.viewer.borrow().hit_test(x, y)?;
        Ok(hit.map(|id| id.display_name()))
    }

    /// Register `callback(type, detail)` for selection events. Pass
    /// `null` to unregister.
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&self, callback: Option<Function>) {
        *self.on_event.borrow_mut() = callback;
    }

    /// Apply a JSON configuration object
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&self, config_json: &str) -> Result<(), JsError> {
        let config = ViewerConfig::from_json(config_json)
            .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
        let result = self.viewer.borrow_mut().set_config(config);
        self.dispatch_events();
        Ok(result?)
    }

    /// Current configuration as JSON
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> String {
        serde_json::to_string(self.viewer.borrow().config()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Fetch the axis label font and add labels once it is available.
    /// Resolves to whether the font loaded; on failure the viewer keeps
    /// working without labels.
    #[wasm_bindgen(js_name = loadFont)]
    pub fn load_font(&self, url: String) -> Promise {
        let viewer = Rc::downgrade(&self.viewer);
        wasm_bindgen_futures::future_to_promise(async move {
            let font = fetch_bytes(&url).await;
            let Some(viewer) = viewer.upgrade() else {
                return Ok(JsValue::FALSE);
            };
            let loaded = match font {
                Ok(font) => viewer.borrow().backend().register_font(&font),
                Err(error) => {
                    tracing::warn!(url = %url, error = ?error, "Failed to load label font");
                    false
                }
            };
            if let Err(error) = viewer.borrow_mut().font_loaded(loaded) {
                tracing::debug!(%error, "Font arrived after teardown");
            }
            Ok(JsValue::from_bool(loaded))
        })
    }

    #[wasm_bindgen(getter, js_name = isTornDown)]
    pub fn is_torn_down(&self) -> bool {
        self.viewer.borrow().is_torn_down()
    }

    /// Stop drawing, detach input listeners and release every renderer
    /// resource. Returns false if already torn down.
    pub fn teardown(&mut self) -> bool {
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        {
            let mut render_loop = self.render_loop.borrow_mut();
            render_loop.stop();
            render_loop.scheduler_mut().release_callback();
        }
        *self.on_event.borrow_mut() = None;
        match self.viewer.try_borrow_mut() {
            Ok(mut viewer) => viewer.teardown(),
            Err(_) => false,
        }
    }
}

impl StructureViewer {
    fn start_render_loop(&mut self) {
        let viewer = Rc::clone(&self.viewer);
        let render_loop = Rc::downgrade(&self.render_loop);
        let callback = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
            let Some(render_loop) = render_loop.upgrade() else {
                return;
            };
            let Ok(mut render_loop) = render_loop.try_borrow_mut() else {
                return;
            };
            let Ok(mut viewer) = viewer.try_borrow_mut() else {
                return;
            };
            if let Err(error) = render_loop.tick(&mut viewer) {
                tracing::error!(%error, "Render loop stopped");
            }
        });

        let mut render_loop = self.render_loop.borrow_mut();
        render_loop.scheduler_mut().set_callback(callback);
        render_loop.start();
    }

    fn attach_listeners(&mut self, window: &web_sys::Window) -> Result<(), JsError> {
        let target: EventTarget = self.container.clone().into();

        let (viewer, container) = (self.viewer.clone(), self.container.clone());
        self.listen(&target, "pointerdown", true, move |event| {
            let Some(event) = event.dyn_ref::<PointerEvent>() else {
                return;
            };
            let (x, y) = local_point(&container, event.client_x(), event.client_y());
            let button = match event.button() {
                2 => PointerButton::Secondary,
                _ => PointerButton::Primary,
            };
            let _ = container.set_pointer_capture(event.pointer_id());
            log_input_error(viewer.borrow_mut().pointer_down(x, y, button));
        })?;

        let (viewer, container) = (self.viewer.clone(), self.container.clone());
        self.listen(&target, "pointermove", true, move |event| {
            let Some(event) = event.dyn_ref::<PointerEvent>() else {
                return;
            };
            let (x, y) = local_point(&container, event.client_x(), event.client_y());
            log_input_error(viewer.borrow_mut().pointer_move(x, y));
        })?;

        let (viewer, container, on_event) = (
            self.viewer.clone(),
            self.container.clone(),
            self.on_event.clone(),
        );
        self.listen(&target, "pointerup", true, move |event| {
            let Some(event) = event.dyn_ref::<PointerEvent>() else {
                return;
            };
            let (x, y) = local_point(&container, event.client_x(), event.client_y());
            let _ = container.release_pointer_capture(event.pointer_id());
            let result = viewer.borrow_mut().pointer_up(x, y);
            log_input_error(result.map(|_| ()));
            dispatch(&viewer, &on_event);
        })?;

        let viewer = self.viewer.clone();
        self.listen(&target, "wheel", false, move |event| {
            let Some(event) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            event.prevent_default();
            let delta = match event.delta_mode() {
                WheelEvent::DOM_DELTA_LINE => event.delta_y() * WHEEL_LINE_HEIGHT,
                _ => event.delta_y(),
            };
            log_input_error(viewer.borrow_mut().zoom(delta));
        })?;

        self.listen(&target, "contextmenu", false, |event| {
            event.prevent_default();
        })?;

        let window_target: EventTarget = window.clone().into();
        let (viewer, container) = (self.viewer.clone(), self.container.clone());
        self.listen(&window_target, "resize", true, move |_| {
            log_input_error(resize_to(&viewer, &container));
        })?;

        if let Some(document) = window.document() {
            let document_target: EventTarget = document.into();
            let (viewer, container) = (Rc::downgrade(&self.viewer), self.container.clone());
            self.listen(&document_target, "fullscreenchange", true, move |_| {
                let Some(shared) = viewer.upgrade() else {
                    return;
                };
                let delay = shared.borrow().config().resize_settle_ms;
                spawn_local(settle_then_resize(
                    Rc::downgrade(&shared),
                    container.clone(),
                    delay,
                ));
            })?;
        }
        Ok(())
    }

    fn listen<F>(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        passive: bool,
        handler: F,
    ) -> Result<(), JsError>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|_| JsError::new(&format!("Failed to listen for {}", kind)))?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }

    fn dispatch_events(&self) {
        dispatch(&self.viewer, &self.on_event);
    }
}

impl Drop for StructureViewer {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Deliver queued viewer events to the registered callback. The viewer is
/// not borrowed while the callback runs, so it may call back in.
fn dispatch(viewer: &SharedViewer, on_event: &EventCallback) {
    let events = match viewer.try_borrow_mut() {
        Ok(mut viewer) => viewer.take_events(),
        Err(_) => return,
    };
    if events.is_empty() {
        return;
    }
    let Some(callback) = on_event.borrow().clone() else {
        return;
    };
    for event in events {
        let detail = match to_js(&event) {
            Ok(detail) => detail,
            Err(_) => continue,
        };
        if let Err(error) = callback.call2(&JsValue::NULL, &JsValue::from_str(event.name()), &detail)
        {
            tracing::warn!(error = ?error, event = event.name(), "Event callback threw");
        }
    }
}

fn resize_to(viewer: &SharedViewer, container: &HtmlElement) -> Result<(), ViewerError> {
    let (width, height) = element_size(container);
    if width == 0 || height == 0 {
        return Ok(());
    }
    viewer.borrow_mut().handle_resize(width, height)
}

async fn settle_then_resize(viewer: Weak<RefCell<Viewer<JsBackend>>>, container: HtmlElement, delay: u32) {
    gloo_timers::future::TimeoutFuture::new(delay).await;
    if let Some(viewer) = viewer.upgrade() {
        if let Err(error) = resize_to(&viewer, &container) {
            tracing::debug!(%error, "Skipped resize");
        }
    }
}

async fn fetch_bytes(url: &str) -> Result<JsValue, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No global window"))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", response.status())));
    }
    JsFuture::from(response.array_buffer()?).await
}

fn log_input_error(result: Result<(), ViewerError>) {
    match result {
        Ok(()) | Err(ViewerError::TornDown) => {}
        Err(error) => tracing::warn!(%error, "Input handling failed"),
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Failed to convert result: {}", e)))
}
