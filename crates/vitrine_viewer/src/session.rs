//! Viewer session.
//!
//! A session starts in [`SessionState::Loading`] and renders nothing until
//! every load step has completed, at which point it switches to
//! [`SessionState::Ready`] in one move. A failed load is terminal.
//!
//! The host drives it with [`ViewerSession::step`] once per display frame
//! and forwards pointer and resize events.

use std::sync::Arc;

use glam::{Quat, Vec3};
use vitrine_animation::{AnimationAction, AnimationMixer, Binder};
use vitrine_assets::{
    AnimationDescription, AssetReaderVariant, Caption, LoadedModel, SceneProvider,
    active_captions, load_description, load_scene_document,
};
use vitrine_core::{DEFAULT_FPS, FrameClock, NodeHandle, Result, VitrineError};
use vitrine_scene::{
    Camera, Node, OpacityDriver, PickMode, PickResolver, Scene, Selection, VisibilityReport,
    screen_to_ndc,
};

use crate::input::{PointerEvent, Viewport};
use crate::settings::ViewerSettings;

/// Everything that exists once loading has finished.
pub struct Stage {
    scene: Scene,
    model: LoadedModel,
    wrapper: NodeHandle,
    camera: NodeHandle,
    mixer: AnimationMixer,
    opacity: OpacityDriver,
    picker: PickResolver,
    captions: Vec<Caption>,
    visibility: VisibilityReport,
    frame_rate: Option<f32>,
}

impl Stage {
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[must_use]
    pub fn model_root(&self) -> NodeHandle {
        self.model.root
    }

    /// Node carrying the axis correction; parent of the model root.
    #[must_use]
    pub fn wrapper(&self) -> NodeHandle {
        self.wrapper
    }

    /// Camera node used for rendering and picking.
    #[must_use]
    pub fn camera(&self) -> NodeHandle {
        self.camera
    }

    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    #[must_use]
    pub fn opacity(&self) -> &OpacityDriver {
        &self.opacity
    }

    #[must_use]
    pub fn visibility(&self) -> VisibilityReport {
        self.visibility
    }

    #[must_use]
    pub fn captions(&self) -> &[Caption] {
        &self.captions
    }

    /// Playback rate authored in the animation description, if any.
    #[must_use]
    pub fn frame_rate(&self) -> Option<f32> {
        self.frame_rate
    }

    /// Fixed-rate clock at the authored rate, or [`DEFAULT_FPS`] without one.
    #[must_use]
    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::fixed_rate(self.frame_rate.unwrap_or(DEFAULT_FPS))
    }
}

pub enum SessionState {
    Loading,
    Ready(Box<Stage>),
    Failed(String),
}

/// What the renderer should draw this frame.
pub enum RenderableFrame<'a> {
    /// Not ready (or failed): draw nothing from the scene.
    Blank,
    Scene(FrameView<'a>),
}

pub struct FrameView<'a> {
    pub scene: &'a Scene,
    pub camera: NodeHandle,
    /// Clip time shared by the transform and opacity passes.
    pub time: f32,
    pub selection: &'a Selection,
    /// Active caption chain, outermost first.
    pub captions: Vec<&'a Caption>,
}

pub struct ViewerSession {
    settings: ViewerSettings,
    viewport: Viewport,
    state: SessionState,
    selection: Selection,
}

impl ViewerSession {
    #[must_use]
    pub fn new(settings: ViewerSettings, viewport: Viewport) -> Self {
        Self {
            settings,
            viewport,
            state: SessionState::Loading,
            selection: Selection::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready(_))
    }

    /// Reason of a terminal load failure.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    #[must_use]
    pub fn stage(&self) -> Option<&Stage> {
        match &self.state {
            SessionState::Ready(stage) => Some(stage),
            _ => None,
        }
    }

    pub fn stage_mut(&mut self) -> Option<&mut Stage> {
        match &mut self.state {
            SessionState::Ready(stage) => Some(stage),
            _ => None,
        }
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Fetches the model and the animation description, then finishes the
    /// load. Any error leaves the session permanently failed.
    pub async fn load(&mut self, reader: &AssetReaderVariant) -> Result<()> {
        self.ensure_loading()?;

        let fetched = async {
            let document = load_scene_document(reader, &self.settings.model_uri).await?;
            let description = load_description(reader, &self.settings.animation_uri).await?;
            Ok::<_, VitrineError>((document, description))
        }
        .await;

        match fetched {
            Ok((document, description)) => self.complete(&document, &description),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Builds the stage from already fetched inputs and opens the ready gate.
    pub fn complete(
        &mut self,
        provider: &impl SceneProvider,
        description: &AnimationDescription,
    ) -> Result<()> {
        self.ensure_loading()?;

        match build_stage(&self.settings, self.viewport, provider, description) {
            Ok(stage) => {
                log::info!(
                    "Viewer ready: clip '{}' ({:.2}s), {} opacity tracks",
                    description.name,
                    stage.mixer.actions().first().map_or(0.0, |a| a.clip().duration),
                    stage.opacity.len()
                );
                self.state = SessionState::Ready(Box::new(stage));
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn ensure_loading(&self) -> Result<()> {
        match &self.state {
            SessionState::Loading => Ok(()),
            SessionState::Ready(_) => Err(VitrineError::LoadFailed("session already loaded".into())),
            SessionState::Failed(reason) => Err(VitrineError::LoadFailed(reason.clone())),
        }
    }

    fn fail(&mut self, error: VitrineError) -> VitrineError {
        log::error!("Failed to load viewer assets: {error}");
        self.state = SessionState::Failed(error.to_string());
        error
    }

    // ========================================================================
    // Frame loop
    // ========================================================================

    /// Advances the animation by `dt` seconds and returns what to draw.
    ///
    /// Transform tracks are applied first; opacity tracks are then sampled at
    /// the mixer's resolved time so both passes share one time reference.
    pub fn step(&mut self, dt: f32) -> RenderableFrame<'_> {
        let SessionState::Ready(stage) = &mut self.state else {
            return RenderableFrame::Blank;
        };

        stage.mixer.update(dt, &mut stage.scene);
        let time = stage.mixer.time().unwrap_or(0.0);
        stage.opacity.apply(&mut stage.scene, time);
        stage.scene.update_matrix_world();

        RenderableFrame::Scene(FrameView {
            scene: &stage.scene,
            camera: stage.camera,
            time,
            selection: &self.selection,
            captions: active_captions(&stage.captions, time),
        })
    }

    /// Jumps the clip to `time` and poses transforms and opacity for it.
    pub fn seek(&mut self, time: f32) -> Result<()> {
        let SessionState::Ready(stage) = &mut self.state else {
            return Err(VitrineError::NotReady);
        };

        stage.mixer.set_time(time, &mut stage.scene);
        let time = stage.mixer.time().unwrap_or(0.0);
        stage.opacity.apply(&mut stage.scene, time);
        stage.scene.update_matrix_world();
        Ok(())
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Selects a node of the model by display name (or tag), as if it had
    /// been clicked.
    pub fn select_by_name(&mut self, name: &str, mode: PickMode) -> Result<&Selection> {
        let SessionState::Ready(stage) = &self.state else {
            return Err(VitrineError::NotReady);
        };

        let root = stage.model.root;
        let node = stage
            .scene
            .find_by_name(root, name)
            .or_else(|| stage.scene.find_by_tag(root, name))
            .ok_or_else(|| VitrineError::NodeNotFound(name.to_string()))?;

        self.selection = stage.picker.expand(&stage.scene, node, mode);
        Ok(&self.selection)
    }

    /// Picks under the cursor and replaces the selection. A miss clears it.
    /// Ignored until the session is ready.
    pub fn on_pointer(&mut self, event: PointerEvent) -> &Selection {
        let SessionState::Ready(stage) = &self.state else {
            return &self.selection;
        };
        let Some(camera) = stage.scene.camera_of(stage.camera) else {
            return &self.selection;
        };

        let ndc = screen_to_ndc(event.position, self.viewport.size());
        let ray = camera.ray_from_ndc(ndc);
        let mode = event.pick_mode();
        let (hit, selection) = stage.picker.pick(&stage.scene, &ray, mode);

        match hit {
            Some(hit) => log::debug!(
                "Pick {:?}: hit {:?} at {:.3}, {} selected",
                mode,
                stage.scene.get_name(hit.node).unwrap_or_default(),
                hit.distance,
                selection.len()
            ),
            None => log::debug!("Pick: nothing hit, selection cleared"),
        }

        self.selection = selection;
        &self.selection
    }

    /// Updates the viewport and the active camera's projection.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        let aspect = self.viewport.aspect();
        if let Some(stage) = self.stage_mut() {
            let camera = stage.camera;
            if let Some(cam) = stage.scene.camera_of_mut(camera) {
                cam.set_aspect(aspect);
            }
        }
    }
}

fn build_stage(
    settings: &ViewerSettings,
    viewport: Viewport,
    provider: &impl SceneProvider,
    description: &AnimationDescription,
) -> Result<Stage> {
    let mut scene = Scene::new();
    let model = provider.populate(&mut scene)?;

    rename_nodes_from_tags(&mut scene, model.root, &settings.camera_name);

    let wrapper = scene.create_node_with_name("ModelWrapper");
    scene.nodes[wrapper].transform.rotation = Quat::from_rotation_x(settings.model_axis_fix_x);
    scene.attach(model.root, wrapper);
    scene.update_matrix_world();

    let camera = select_camera(&mut scene, &model, wrapper, settings, viewport);
    scene.active_camera = Some(camera);

    let visibility = description.visibility.apply(&mut scene, model.root);

    // Transform clip
    let clip = Arc::new(description.build_clip());
    let bindings = Binder::bind(&clip, |name| scene.find_by_name(model.root, name));
    let mut action = AnimationAction::new(clip).with_bindings(bindings);
    action.loop_mode = settings.loop_mode.into();
    action.reset();

    let mut mixer = AnimationMixer::new();
    mixer.add_action(action);
    mixer.set_time(0.0, &mut scene);

    // Opacity tracks
    let mut opacity = OpacityDriver::new();
    for (node_name, track) in description.opacity_tracks() {
        opacity.bind_by_name(&mut scene, model.root, &node_name, track);
    }
    opacity.apply(&mut scene, mixer.time().unwrap_or(0.0));

    scene.update_matrix_world();

    Ok(Stage {
        scene,
        picker: PickResolver::new(model.root),
        model,
        wrapper,
        camera,
        mixer,
        opacity,
        captions: description.captions.clone(),
        visibility,
        frame_rate: description.fps,
    })
}

/// Display names become the stable tag, so tracks can address nodes by it.
/// The render camera keeps its configured name.
fn rename_nodes_from_tags(scene: &mut Scene, root: NodeHandle, camera_name: &str) {
    for handle in scene.descendants(root) {
        let node = &mut scene.nodes[handle];
        if node.is_camera() && node.name == camera_name {
            continue;
        }
        if let Some(tag) = &node.tag {
            node.name.clone_from(tag);
        }
    }
}

/// Named embedded camera, else the first embedded camera, else a fallback
/// framed on the model.
fn select_camera(
    scene: &mut Scene,
    model: &LoadedModel,
    wrapper: NodeHandle,
    settings: &ViewerSettings,
    viewport: Viewport,
) -> NodeHandle {
    let embedded = scene
        .find_by_name(model.root, &settings.camera_name)
        .filter(|&h| scene.nodes[h].is_camera())
        .or_else(|| model.cameras.first().copied());

    if let Some(handle) = embedded {
        if let Some(cam) = scene.camera_of_mut(handle) {
            cam.set_aspect(viewport.aspect());
        }
        log::info!("Using embedded camera '{}'", scene.nodes[handle].name);
        return handle;
    }

    let fallback = &settings.fallback_camera;
    let camera = Camera::new_perspective(fallback.fov, viewport.aspect(), fallback.near, fallback.far);
    let key = scene.add_camera(camera);

    let mut node = Node::with_name("FallbackCamera");
    node.camera = Some(key);
    frame_bounds(scene, wrapper, &mut node);
    let handle = scene.add_node(node);
    scene.update_matrix_world();

    log::info!("Using fallback camera");
    handle
}

fn frame_bounds(scene: &Scene, target: NodeHandle, camera_node: &mut Node) {
    let (center, size) = scene
        .world_bounding_box(target)
        .map_or((Vec3::ZERO, 5.0), |b| (b.center(), b.size().length()));

    camera_node.transform.position = center + Vec3::new(size * 0.25, size * 0.15, size * 0.25);
    camera_node.transform.look_at(center, Vec3::Y);
}
