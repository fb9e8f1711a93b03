//! Input system with action and axis mapping
//!
//! Raw winit events are turned into named actions (pressed/released edges) and
//! named axes (continuous values). Scripted drivers and tests inject the same
//! actions and axes directly through [`InputState`].

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Discrete game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Fire the current weapon (left mouse button by default)
    Fire,
    /// Launch the held object (right mouse button by default)
    Launch,
    /// Switch to the projectile launcher (1 by default)
    SelectProjectileMode,
    /// Switch to the gravity gun (2 by default)
    SelectGravityMode,
    /// Jump (Space by default)
    Jump,
}

/// Continuous game axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAxis {
    /// Forward/backward movement, positive forward
    MoveForward,
    /// Strafe, positive right
    MoveRight,
    /// Direct yaw delta in degrees (mouse)
    Turn,
    /// Yaw rate, normalized [-1, 1] (gamepad stick)
    TurnRate,
    /// Direct pitch delta in degrees (mouse)
    LookUp,
    /// Pitch rate, normalized [-1, 1] (gamepad stick)
    LookUpRate,
}

/// Actions and axes as seen by one fixed step
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions down right now
    pub held: HashSet<InputAction>,
    /// Press edges since the last `clear_frame`
    pub just_pressed: HashSet<InputAction>,
    /// Release edges since the last `clear_frame`
    pub just_released: HashSet<InputAction>,
    /// Axis values; unset axes read as zero
    pub axes: HashMap<InputAxis, f32>,
    /// Look delta in degrees accumulated this frame
    pub mouse_delta: Vec2,
    /// Mouse motion only counts while captured
    pub cursor_captured: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Pressed since the last `clear_frame`
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Released since the last `clear_frame`
    pub fn is_just_released(&self, action: InputAction) -> bool {
        self.just_released.contains(&action)
    }

    /// Current value of an axis
    pub fn axis(&self, axis: InputAxis) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }

    /// Press an action; holding it again does not repeat the edge
    pub fn press(&mut self, action: InputAction) {
        if self.held.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Release an action that is held
    pub fn release(&mut self, action: InputAction) {
        if self.held.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Overwrite an axis value
    pub fn set_axis(&mut self, axis: InputAxis, value: f32) {
        self.axes.insert(axis, value);
    }

    /// Add to an axis value
    pub fn add_axis(&mut self, axis: InputAxis, delta: f32) {
        *self.axes.entry(axis).or_insert(0.0) += delta;
    }

    /// Drop edges and mouse motion; held actions and axes persist
    pub fn clear_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.mouse_delta = Vec2::ZERO;
    }
}

/// A physical key or mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputBinding {
    Key(KeyCode),
    /// Mouse button
    /// 0 = left, 1 = right, 2 = middle
    Mouse(u32),
}

impl From<KeyCode> for InputBinding {
    fn from(key: KeyCode) -> Self {
        Self::Key(key)
    }
}

impl From<MouseButton> for InputBinding {
    fn from(button: MouseButton) -> Self {
        Self::Mouse(match button {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
            MouseButton::Back => 3,
            MouseButton::Forward => 4,
            MouseButton::Other(id) => id as u32,
        })
    }
}

/// What a binding drives
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BindingTarget {
    Action(InputAction),
    /// Adds `scale` to the axis while held
    Axis(InputAxis, f32),
}

/// Which action or axis each physical input drives
#[derive(Debug, Clone)]
pub struct InputBindings {
    bindings: HashMap<InputBinding, BindingTarget>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
        };

        // WASD
        bindings.bind_axis(KeyCode::KeyW, InputAxis::MoveForward, 1.0);
        bindings.bind_axis(KeyCode::KeyS, InputAxis::MoveForward, -1.0);
        bindings.bind_axis(KeyCode::KeyD, InputAxis::MoveRight, 1.0);
        bindings.bind_axis(KeyCode::KeyA, InputAxis::MoveRight, -1.0);

        // Arrows
        bindings.bind_axis(KeyCode::ArrowUp, InputAxis::MoveForward, 1.0);
        bindings.bind_axis(KeyCode::ArrowDown, InputAxis::MoveForward, -1.0);
        bindings.bind_axis(KeyCode::ArrowRight, InputAxis::MoveRight, 1.0);
        bindings.bind_axis(KeyCode::ArrowLeft, InputAxis::MoveRight, -1.0);

        bindings.bind(KeyCode::Space, InputAction::Jump);

        // Weapon
        bindings.bind(MouseButton::Left, InputAction::Fire);
        bindings.bind(MouseButton::Right, InputAction::Launch);
        bindings.bind(KeyCode::Digit1, InputAction::SelectProjectileMode);
        bindings.bind(KeyCode::Digit2, InputAction::SelectGravityMode);

        bindings
    }
}

impl InputBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key or button to an action
    pub fn bind(&mut self, binding: impl Into<InputBinding>, action: InputAction) {
        self.bindings
            .insert(binding.into(), BindingTarget::Action(action));
    }

    /// Bind a key or button to an axis contribution
    pub fn bind_axis(&mut self, binding: impl Into<InputBinding>, axis: InputAxis, scale: f32) {
        self.bindings
            .insert(binding.into(), BindingTarget::Axis(axis, scale));
    }

    /// What a binding drives, if anything
    pub fn target(&self, binding: &InputBinding) -> Option<BindingTarget> {
        self.bindings.get(binding).copied()
    }

    /// The action for a key, if any
    pub fn get_key_action(&self, key: KeyCode) -> Option<InputAction> {
        match self.target(&InputBinding::Key(key)) {
            Some(BindingTarget::Action(action)) => Some(action),
            _ => None,
        }
    }
}

/// Turns winit events into [`InputState`] changes
#[derive(Debug)]
pub struct InputHandler {
    pub state: InputState,
    pub bindings: InputBindings,
    /// Degrees of yaw/pitch per pixel of mouse motion
    pub mouse_sensitivity: f32,
    /// Flip mouse pitch
    pub invert_y: bool,
    held_bindings: HashSet<InputBinding>,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            state: InputState::new(),
            bindings: InputBindings::default(),
            mouse_sensitivity: 0.1,
            invert_y: false,
            held_bindings: HashSet::new(),
        }
    }

    /// Feed a winit keyboard event; unbound and unidentified keys are ignored
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, element_state: ElementState) {
        if let PhysicalKey::Code(key_code) = physical_key {
            self.handle_binding(InputBinding::Key(key_code), element_state);
        }
    }

    /// Feed a winit mouse button event
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.handle_binding(button.into(), state);
    }

    fn handle_binding(&mut self, binding: InputBinding, element_state: ElementState) {
        let Some(target) = self.bindings.target(&binding) else {
            return;
        };

        // Key repeat must not stack axis contributions
        let changed = match element_state {
            ElementState::Pressed => self.held_bindings.insert(binding),
            ElementState::Released => self.held_bindings.remove(&binding),
        };

        match (target, element_state) {
            (BindingTarget::Action(action), ElementState::Pressed) => self.state.press(action),
            (BindingTarget::Action(action), ElementState::Released) => self.state.release(action),
            (BindingTarget::Axis(axis, scale), ElementState::Pressed) if changed => {
                self.state.add_axis(axis, scale)
            }
            (BindingTarget::Axis(axis, scale), ElementState::Released) if changed => {
                self.state.add_axis(axis, -scale)
            }
            _ => {}
        }
    }

    /// Feed raw mouse motion in pixels
    pub fn handle_mouse_motion(&mut self, delta: (f64, f64)) {
        if self.state.cursor_captured {
            let pitch_sign = if self.invert_y { -1.0 } else { 1.0 };
            self.state.mouse_delta += Vec2::new(
                delta.0 as f32 * self.mouse_sensitivity,
                delta.1 as f32 * self.mouse_sensitivity * pitch_sign,
            );
        }
    }

    /// Call once the frame's fixed steps have consumed the input
    pub fn end_frame(&mut self) {
        self.state.clear_frame();
    }

    pub fn set_cursor_captured(&mut self, captured: bool) {
        self.state.cursor_captured = captured;
    }
}
