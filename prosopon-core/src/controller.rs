//! Frame controller
//!
//! Owns all runtime state and drives one frame per [`Controller::run_tick`]
//! call: sensor polling, overlay transitions, menu input, animation
//! drawing and presentation. The host owns the loop timing and calls in at
//! the configured framerate with a monotonic millisecond clock.

use alloc::rc::Rc;
use core::cell::Cell;
use core::fmt::Write as _;

use crate::animation::{Animation, AnimationKind, FrameCtx};
use crate::assets::{load_checked, AssetError, AssetSource, ImageKind};
use crate::color::{Channel, Rgba};
use crate::config::Config;
use crate::driver::{AccelSample, Blinker, Button, Driver, DriverError};
use crate::menu::{ActionItem, MenuNav, MenuNode, NavResult, SettingItem, Submenu};
use crate::mirror::Mirror;
use crate::state::OverlayState;
use crate::surface::{PixelSurface, PresentError, Shared};
use crate::text::{LogSink, TextPanel};

/// Smallest status panel grid the overlays are laid out for.
const MIN_COLS: u8 = 15;
const MIN_ROWS: u8 = 4;

/// Errors constructing or initializing the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    AlreadyInitialized,
    ZeroFramerate,
    StatusPanelTooSmall,
    /// Face display bring-up failed
    EarlyInit(DriverError),
    /// Default face assets missing or invalid
    Asset(AssetError),
}

/// Unrecoverable runtime faults.
///
/// Once a fatal fault is recorded the controller stays halted: every
/// subsequent tick toggles the status LED as a distress blink and returns
/// the same fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fatal {
    NotInitialized,
    FacePresent(PresentError),
    StatusPresent(PresentError),
}

/// Deferred requests posted by menu callbacks.
///
/// Menu callbacks run while the navigation tree is mutably borrowed, so
/// they cannot touch the controller directly. They post into these cells
/// instead and the controller drains them later in the same tick.
#[derive(Default)]
struct MenuRequests {
    animation: Cell<Option<AnimationKind>>,
    preview_channel: Cell<Option<Channel>>,
    preview_skip: Cell<Option<u8>>,
    blank: Cell<bool>,
}

impl MenuRequests {
    fn request_animation(&self, kind: AnimationKind) {
        self.animation.set(Some(kind));
    }

    fn request_preview_channel(&self, channel: Channel) {
        self.preview_channel.set(Some(channel));
    }

    fn request_preview_skip(&self, skip: u8) {
        self.preview_skip.set(Some(skip));
    }

    fn request_blank(&self) {
        self.blank.set(true);
    }
}

/// Ticks elapsed over the last whole second.
fn measure_fps(tick: u32, last_ticks: u32) -> u32 {
    tick.wrapping_sub(last_ticks)
}

/// The face firmware core.
pub struct Controller<D: Driver, S, T, B, A> {
    config: Config,
    driver: D,
    assets: A,
    blinker: B,
    status: Shared<S>,
    text: T,
    face: Option<Mirror<D::Face, Shared<S>>>,

    overlay: OverlayState,
    overlay_since_ms: u32,
    idle_redraw_ms: u32,
    nav: Option<MenuNav>,
    requests: Rc<MenuRequests>,

    anim: Option<Animation>,
    anim_pending_activate: bool,

    boop: Option<u8>,
    accel: Option<AccelSample>,

    tick: u32,
    last_sec_ms: u32,
    last_ticks: u32,
    last_fps: u32,

    initialized: bool,
    halted: Option<Fatal>,
    halt_led_on: bool,
}

impl<D, S, T, B, A> Controller<D, S, T, B, A>
where
    D: Driver,
    S: PixelSurface,
    T: TextPanel,
    B: Blinker,
    A: AssetSource,
{
    pub fn new(
        config: Config,
        driver: D,
        status: Shared<S>,
        text: T,
        blinker: B,
        assets: A,
    ) -> Result<Self, InitError> {
        if config.framerate == 0 {
            return Err(InitError::ZeroFramerate);
        }
        let (cols, rows) = text.size();
        if cols < MIN_COLS || rows < MIN_ROWS {
            return Err(InitError::StatusPanelTooSmall);
        }
        Ok(Self {
            config,
            driver,
            assets,
            blinker,
            status,
            text,
            face: None,
            overlay: OverlayState::Boot,
            overlay_since_ms: 0,
            idle_redraw_ms: 0,
            nav: None,
            requests: Rc::new(MenuRequests::default()),
            anim: None,
            anim_pending_activate: false,
            boop: None,
            accel: None,
            tick: 0,
            last_sec_ms: 0,
            last_ticks: 0,
            last_fps: 0,
            initialized: false,
            halted: None,
            halt_led_on: false,
        })
    }

    /// Bring up displays, devices and the default face.
    ///
    /// The boot log stays on the status panel until the boot overlay times
    /// out or a button is pressed.
    pub fn init(&mut self, now_ms: u32) -> Result<(), InitError> {
        if self.initialized {
            return Err(InitError::AlreadyInitialized);
        }

        self.blinker.set_high();
        self.text.clear();
        let _ = self.text.set_line_inverse(0, "PROSOPON BOOTING");
        self.text.set_cursor_row(1);
        self.text.log("Initialize devices");

        let face_surface = match self.driver.early_init() {
            Ok(s) => s,
            Err(e) => {
                self.text.log_error("Face display failed");
                return Err(InitError::EarlyInit(e));
            }
        };
        let mut face = Mirror::new(face_surface, Some(self.status.clone()), self.config.preview);

        // hold a wait image on the face while the rest comes up
        if let Ok(img) = load_checked(&mut self.assets, ImageKind::Full, "wait") {
            crate::animation::draw_image(&mut face, 0, 0, &img, false);
            let _ = face.present();
        }
        self.face = Some(face);

        if let Some(m) = self.driver.memory_stats() {
            let mut line: heapless::String<32> = heapless::String::new();
            let _ = write!(line, "mem {}k/{}k", m.free_kib, m.total_kib);
            self.text.log(&line);
        }

        if self.driver.late_init(&mut self.text).is_err() {
            self.text.log_error("Device init failed");
        }

        match self.driver.wall_clock() {
            Some(c) => {
                let mut line: heapless::String<32> = heapless::String::new();
                let _ = write!(line, "clock {:02}:{:02}", c.hours, c.minutes);
                self.text.log(&line);
            }
            None => self.text.log("clock not set"),
        }

        let anim = Animation::build(AnimationKind::Face, &mut self.assets)
            .map_err(InitError::Asset)?;
        self.anim = Some(anim);
        self.anim_pending_activate = true;

        self.text.log("Prosopon online.");
        // the log may have scrolled on a short panel; keep the banner on top
        let _ = self.text.set_line_inverse(0, "PROSOPON BOOTING");
        self.overlay = OverlayState::Boot;
        self.overlay_since_ms = now_ms;
        self.last_sec_ms = now_ms;
        self.initialized = true;
        Ok(())
    }

    /// Run one frame. Call at the configured framerate.
    pub fn run_tick(&mut self, now_ms: u32) -> Result<(), Fatal> {
        if let Some(f) = self.halted {
            // distress blink, nothing else runs
            self.halt_led_on = !self.halt_led_on;
            if self.halt_led_on {
                self.blinker.set_high();
            } else {
                self.blinker.set_low();
            }
            return Err(f);
        }
        if !self.initialized {
            return Err(Fatal::NotInitialized);
        }

        // LED is low for the duration of the frame's work
        self.blinker.set_low();
        self.tick = self.tick.wrapping_add(1);

        self.read_sensors();

        if now_ms.wrapping_sub(self.last_sec_ms) >= 1000 {
            self.last_fps = measure_fps(self.tick, self.last_ticks);
            self.last_ticks = self.tick;
            self.last_sec_ms = now_ms;
        }

        self.update_overlay(now_ms);
        self.drain_requests(now_ms);

        let gate = self.overlay == OverlayState::Idle
            && self.status.can_present_now()
            && self.frame_skip_permits();

        let talking = self.driver.talking();
        let ctx = FrameCtx {
            tick: self.tick,
            now_ms,
            talking,
        };

        let mut finished = false;
        if let (Some(anim), Some(face)) = (self.anim.as_mut(), self.face.as_mut()) {
            face.set_preview_gate(gate);
            if self.anim_pending_activate {
                anim.activate(face);
                self.anim_pending_activate = false;
            }
            finished = !anim.draw_frame(face, &ctx);
        }
        if finished {
            // takes effect on the next tick's activate
            self.set_animation(AnimationKind::Face);
        }

        if let Some(face) = self.face.as_mut() {
            if face.can_present_now() {
                if let Err(e) = face.present() {
                    let f = Fatal::FacePresent(e);
                    self.halted = Some(f);
                    return Err(f);
                }
            }
        }

        if self.overlay != OverlayState::Blank && self.status.can_present_now() {
            if let Err(e) = self.status.present() {
                let f = Fatal::StatusPresent(e);
                self.halted = Some(f);
                return Err(f);
            }
        }

        self.blinker.set_high();
        Ok(())
    }

    pub fn overlay(&self) -> OverlayState {
        self.overlay
    }

    /// Frames completed over the last measured second.
    pub fn fps(&self) -> u32 {
        self.last_fps
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Whether the default face animation is current.
    pub fn is_default_animation(&self) -> bool {
        match &self.anim {
            Some(a) => a.is_default(),
            None => true,
        }
    }

    fn read_sensors(&mut self) {
        use crate::driver::SensorRead;
        // only a fresh reading updates the cache; Busy and Unavailable
        // leave the last value so transient bus contention never blanks
        // the displayed readouts
        if let SensorRead::Available(v) = self.driver.boop_distance() {
            self.boop = Some(v);
        }
        if let SensorRead::Available(v) = self.driver.accelerometer() {
            self.accel = Some(v);
        }
    }

    fn update_overlay(&mut self, now_ms: u32) {
        let button = self.driver.pressed_button();
        let elapsed = now_ms.wrapping_sub(self.overlay_since_ms);

        match self.overlay {
            OverlayState::Boot => {
                if button.is_some() || elapsed >= self.config.boot_timeout_ms {
                    self.enter_idle(now_ms);
                }
            }
            OverlayState::Idle => {
                match button {
                    Some(Button::Menu) => self.enter_menu(now_ms),
                    Some(Button::Back) => {
                        if !self.is_default_animation() {
                            self.set_animation(AnimationKind::Face);
                        }
                    }
                    _ => {}
                }
                // refreshed at most once a second, honoring the skip divisor
                if self.overlay == OverlayState::Idle
                    && now_ms.wrapping_sub(self.idle_redraw_ms) >= 1000
                    && self.frame_skip_permits()
                {
                    self.draw_idle_status();
                    self.idle_redraw_ms = now_ms;
                }
            }
            OverlayState::Menu => {
                if elapsed >= self.config.menu_timeout_ms {
                    self.enter_idle(now_ms);
                } else if let Some(btn) = button {
                    self.overlay_since_ms = now_ms;
                    let closed = match self.nav.as_mut() {
                        Some(nav) => nav.handle_button(btn, &mut self.text) == NavResult::Closed,
                        None => true,
                    };
                    if closed {
                        self.enter_idle(now_ms);
                    }
                }
            }
            OverlayState::Blank => {
                if button.is_some() {
                    self.enter_idle(now_ms);
                }
            }
        }
    }

    fn drain_requests(&mut self, now_ms: u32) {
        if let Some(kind) = self.requests.animation.take() {
            self.set_animation(kind);
        }

        let mut preview_changed = false;
        if let Some(channel) = self.requests.preview_channel.take() {
            self.config.preview.channel = channel;
            preview_changed = true;
        }
        if let Some(skip) = self.requests.preview_skip.take() {
            self.config.preview.frame_skip = skip;
            preview_changed = true;
        }
        if preview_changed {
            if let Some(face) = self.face.as_mut() {
                face.set_preview_config(self.config.preview);
            }
        }

        if self.requests.blank.take() {
            self.enter_blank(now_ms);
        }
    }

    fn set_animation(&mut self, kind: AnimationKind) {
        // runtime load failures are cosmetic; the current animation stays
        if let Ok(anim) = Animation::build(kind, &mut self.assets) {
            self.anim = Some(anim);
            self.anim_pending_activate = true;
        }
    }

    fn frame_skip_permits(&self) -> bool {
        let skip = self.config.preview.frame_skip;
        skip == 0 || self.tick % skip as u32 == 0
    }

    fn enter_idle(&mut self, now_ms: u32) {
        self.overlay = OverlayState::Idle;
        self.overlay_since_ms = now_ms;
        self.nav = None;
        self.text.clear();
        self.draw_idle_status();
        self.idle_redraw_ms = now_ms;
    }

    fn enter_menu(&mut self, now_ms: u32) {
        self.overlay = OverlayState::Menu;
        self.overlay_since_ms = now_ms;
        let root = self.build_root_menu();
        let mut nav = MenuNav::new(root);
        self.text.clear();
        nav.render(&mut self.text);
        self.nav = Some(nav);
    }

    fn enter_blank(&mut self, now_ms: u32) {
        self.overlay = OverlayState::Blank;
        self.overlay_since_ms = now_ms;
        self.nav = None;
        self.text.clear();
        let (w, h) = self.status.size();
        for y in 0..h {
            for x in 0..w {
                self.status.set_pixel(x, y, Rgba::BLANK);
            }
        }
        let _ = self.status.present();
    }

    fn build_root_menu(&mut self) -> Submenu {
        let mut root = Submenu::new("PROSOPON");

        let mut anims = Submenu::new("Animations");
        let kinds: [(&str, AnimationKind); 4] = [
            ("Face", AnimationKind::Face),
            ("Peek", AnimationKind::Peek("peek")),
            ("Slide", AnimationKind::Slide("slide")),
            ("Static", AnimationKind::Static("logo")),
        ];
        for (name, kind) in kinds {
            let req = Rc::clone(&self.requests);
            anims.push(MenuNode::Action(ActionItem::new(name, move || {
                req.request_animation(kind)
            })));
        }
        root.push(MenuNode::Menu(anims));

        let mut display = Submenu::new("Display");
        let active = match self.config.preview.channel {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        };
        let req = Rc::clone(&self.requests);
        display.push(MenuNode::Setting(SettingItem::new(
            "Preview",
            &["Red", "Green", "Blue"],
            active,
            move |i| {
                req.request_preview_channel(match i {
                    0 => Channel::Red,
                    1 => Channel::Green,
                    _ => Channel::Blue,
                })
            },
        )));
        let active = match self.config.preview.frame_skip {
            0 => 0,
            2 => 1,
            4 => 2,
            _ => 3,
        };
        let req = Rc::clone(&self.requests);
        display.push(MenuNode::Setting(SettingItem::new(
            "Prev skip",
            &["Off", "2", "4", "8"],
            active,
            move |i| {
                req.request_preview_skip(match i {
                    0 => 0,
                    1 => 2,
                    2 => 4,
                    _ => 8,
                })
            },
        )));
        let req = Rc::clone(&self.requests);
        display.push(MenuNode::Action(ActionItem::new("Blank panel", move || {
            req.request_blank()
        })));
        root.push(MenuNode::Menu(display));

        let mut hw = Submenu::new("Hardware");
        for item in self.driver.menu_items() {
            hw.push(item);
        }
        root.push(MenuNode::Menu(hw));

        root
    }

    fn draw_idle_status(&mut self) {
        let mut line: heapless::String<32> = heapless::String::new();
        match self.driver.wall_clock() {
            Some(c) => {
                let _ = write!(line, "{:02}:{:02}", c.hours, c.minutes);
            }
            None => {
                let _ = line.push_str("--:--");
            }
        }
        let _ = write!(line, " {}Hz", self.last_fps);
        if let Some(m) = self.driver.memory_stats() {
            let _ = write!(line, " {}k/{}k", m.free_kib, m.total_kib);
        }
        let _ = self.text.set_line(0, &line);

        let mut line: heapless::String<32> = heapless::String::new();
        match self.boop {
            Some(d) => {
                let _ = write!(line, "boop {}cm", d);
            }
            None => {
                let _ = line.push_str("boop --");
            }
        }
        let _ = self.text.set_line(1, &line);

        let mut line: heapless::String<32> = heapless::String::new();
        match self.accel {
            Some(a) => {
                let _ = write!(line, "acc {} {} {}", a.x, a.y, a.z);
            }
            None => {
                let _ = line.push_str("acc --");
            }
        }
        let _ = self.text.set_line(2, &line);

        let _ = self.text.set_line(3, self.driver.status_line());
    }
}
