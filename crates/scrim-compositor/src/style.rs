use scrim_core::{Insets, TransitionStyle, Widget, resolve};

/// Everything a renderer needs to place and animate one widget wrapper.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderStyle {
    pub insets: Insets,
    pub motion: TransitionStyle,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub padding: Option<f32>,
    pub z_index: Option<i32>,
    /// Stacking order within a shared anchor or region.
    pub order: Option<i32>,
    /// Author opacity, multiplied into the transition opacity.
    pub opacity: Option<f32>,
}

impl RenderStyle {
    pub fn new(widget: &Widget, motion: TransitionStyle) -> Self {
        Self {
            insets: resolve(&widget.position),
            motion,
            width: widget.style.width,
            height: widget.style.height,
            padding: widget.style.padding,
            z_index: widget.style.z_index,
            order: widget.position.order(),
            opacity: widget.style.opacity,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.motion.display_none
    }

    pub fn effective_opacity(&self) -> Option<f32> {
        match (self.motion.opacity, self.opacity) {
            (Some(m), Some(a)) => Some(m * a),
            (m, a) => m.or(a),
        }
    }

    /// Centering shift followed by the motion transform.
    pub fn transform(&self) -> Option<String> {
        let parts: Vec<String> = self
            .insets
            .shift_transform()
            .into_iter()
            .chain(self.motion.transform.map(|t| t.css()))
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    /// CSS declarations in a stable order.
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        let mut out = vec![("position", "absolute".to_string())];
        out.extend(self.insets.declarations());

        let px = |v: f32| format!("{v}px");
        out.extend(self.width.map(|v| ("width", px(v))));
        out.extend(self.height.map(|v| ("height", px(v))));
        out.extend(self.padding.map(|v| ("padding", px(v))));
        out.extend(self.z_index.map(|v| ("z-index", v.to_string())));
        out.extend(self.order.map(|v| ("order", v.to_string())));

        if self.motion.display_none {
            out.push(("display", "none".to_string()));
        }
        out.extend(self.effective_opacity().map(|v| ("opacity", v.to_string())));
        out.extend(
            self.motion
                .pointer_events
                .map(|p| ("pointer-events", p.css().to_string())),
        );
        out.extend(self.transform().map(|t| ("transform", t)));
        out.extend(self.motion.transition.clone().map(|t| ("transition", t)));
        out
    }

    /// Inline style string, e.g. `position: absolute; top: 0px; right: 0px;`.
    pub fn to_css(&self) -> String {
        self.declarations()
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
