//! Grid configuration.

/// Top/bottom insets that shift the auto-scroll trigger edges, for content
/// drawn over the list (toolbars, tab bars).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewPostOffsets {
    pub top: f32,
    pub bottom: f32,
}

/// Idle "jiggle" rotation applied to cards while wobble mode is on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WobbleConfig {
    /// Peak rotation around each axis, in degrees.
    pub rotation_x_deg: f32,
    pub rotation_y_deg: f32,
    pub rotation_z_deg: f32,
    /// Length of one swing.
    pub duration_ms: u64,
    /// Start delays are spread below this bound so cards do not move in
    /// lockstep.
    pub max_start_delay_ms: u64,
}

impl Default for WobbleConfig {
    fn default() -> Self {
        Self {
            rotation_x_deg: 2.0,
            rotation_y_deg: 1.0,
            rotation_z_deg: 0.7,
            duration_ms: 180,
            max_start_delay_ms: 500,
        }
    }
}

/// Timings of the drag choreography, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragTimings {
    /// Displaced cards moving to their new slots, and the drop animation.
    pub rearrange_animation_ms: u64,
    /// The dragged card must hover over the same target this long before
    /// the sequence is rearranged.
    pub rearrange_debounce_ms: u64,
    /// Grace period of a non-forced drag end, during which the touch may be
    /// handed over to the grid.
    pub responder_transfer_grace_ms: u64,
    /// Minimum interval between scroll-driven windowing passes.
    pub window_check_throttle_ms: u64,
    /// How often auto-scroll retries while waiting for more content.
    pub auto_scroll_poll_ms: u64,
    /// Lift and drop scale animation.
    pub scale_animation_ms: u64,
}

impl Default for DragTimings {
    fn default() -> Self {
        Self {
            rearrange_animation_ms: 200,
            rearrange_debounce_ms: 100,
            responder_transfer_grace_ms: 200,
            window_check_throttle_ms: 200,
            auto_scroll_poll_ms: 500,
            scale_animation_ms: 250,
        }
    }
}

/// Configuration for [`crate::MasonryGridController`].
///
/// ```rust
/// use draggrid_foundation::MasonryGridConfig;
///
/// let config = MasonryGridConfig::new()
///     .column_count(3)
///     .column_width(120.0)
///     .end_reached_threshold(0.2);
/// assert_eq!(config.window_size, 21);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MasonryGridConfig {
    pub column_count: usize,
    pub column_width: f32,
    /// Mounted band, in viewport heights, centred on the viewport.
    pub window_size: usize,
    /// Cells whose in-column index is below this always render content.
    pub initial_num_to_render: usize,
    /// Viewport height assumed until the host reports its layout.
    pub initial_viewport_height: f32,
    /// Fraction of the content height from the end at which end-reached
    /// fires. `None` disables end-reached reporting and the auto-scroll
    /// load-more poll.
    pub end_reached_threshold: Option<f32>,
    /// Minimum interval between forwarded scroll events. 0 forwards every
    /// change.
    pub scroll_event_throttle_ms: u64,
    pub view_post_offsets: ViewPostOffsets,
    pub wobble: bool,
    pub wobble_config: WobbleConfig,
    pub timings: DragTimings,
    pub dragged_item_scale: f32,
    /// Auto-scroll speed in pixels per millisecond.
    pub auto_scroll_velocity: f32,
    /// Upper bound of how far the dragged card may leave the viewport before
    /// auto-scroll engages.
    pub edge_padding: f32,
}

impl Default for MasonryGridConfig {
    fn default() -> Self {
        Self {
            column_count: 2,
            column_width: 0.0,
            window_size: 21,
            initial_num_to_render: 5,
            initial_viewport_height: 800.0,
            end_reached_threshold: None,
            scroll_event_throttle_ms: 0,
            view_post_offsets: ViewPostOffsets::default(),
            wobble: false,
            wobble_config: WobbleConfig::default(),
            timings: DragTimings::default(),
            dragged_item_scale: 1.2,
            auto_scroll_velocity: 0.5,
            edge_padding: 50.0,
        }
    }
}

impl MasonryGridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column_count(mut self, column_count: usize) -> Self {
        self.column_count = column_count;
        self
    }

    pub fn column_width(mut self, column_width: f32) -> Self {
        self.column_width = column_width;
        self
    }

    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn initial_num_to_render(mut self, count: usize) -> Self {
        self.initial_num_to_render = count;
        self
    }

    pub fn initial_viewport_height(mut self, height: f32) -> Self {
        self.initial_viewport_height = height;
        self
    }

    pub fn end_reached_threshold(mut self, threshold: f32) -> Self {
        self.end_reached_threshold = Some(threshold);
        self
    }

    pub fn scroll_event_throttle_ms(mut self, throttle_ms: u64) -> Self {
        self.scroll_event_throttle_ms = throttle_ms;
        self
    }

    pub fn view_post_offsets(mut self, top: f32, bottom: f32) -> Self {
        self.view_post_offsets = ViewPostOffsets { top, bottom };
        self
    }

    pub fn wobble(mut self, enabled: bool) -> Self {
        self.wobble = enabled;
        self
    }

    pub fn wobble_config(mut self, config: WobbleConfig) -> Self {
        self.wobble_config = config;
        self
    }

    pub fn timings(mut self, timings: DragTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn dragged_item_scale(mut self, scale: f32) -> Self {
        self.dragged_item_scale = scale;
        self
    }

    pub fn auto_scroll_velocity(mut self, velocity: f32) -> Self {
        self.auto_scroll_velocity = velocity;
        self
    }

    pub fn edge_padding(mut self, padding: f32) -> Self {
        self.edge_padding = padding;
        self
    }

    /// Clamps out-of-range values, logging each correction.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.column_count == 0 {
            log::warn!("column_count must be at least 1, using 1");
            self.column_count = 1;
        }
        if !(self.column_width >= 0.0) {
            log::warn!("column_width {} is invalid, using 0", self.column_width);
            self.column_width = 0.0;
        }
        if self.window_size == 0 {
            log::warn!("window_size must be at least 1, using 1");
            self.window_size = 1;
        }
        if !(self.auto_scroll_velocity > 0.0) {
            log::warn!(
                "auto_scroll_velocity {} must be positive, using {}",
                self.auto_scroll_velocity,
                defaults.auto_scroll_velocity
            );
            self.auto_scroll_velocity = defaults.auto_scroll_velocity;
        }
        if !(self.dragged_item_scale > 0.0) {
            log::warn!(
                "dragged_item_scale {} must be positive, using {}",
                self.dragged_item_scale,
                defaults.dragged_item_scale
            );
            self.dragged_item_scale = defaults.dragged_item_scale;
        }
        if !(self.initial_viewport_height >= 0.0) {
            log::warn!("initial_viewport_height {} is invalid, using 0", self.initial_viewport_height);
            self.initial_viewport_height = 0.0;
        }
        if let Some(threshold) = self.end_reached_threshold {
            if threshold.is_nan() {
                log::warn!("end_reached_threshold is NaN, using 0");
                self.end_reached_threshold = Some(0.0);
            }
        }
        self
    }
}
