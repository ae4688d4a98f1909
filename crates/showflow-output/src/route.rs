//! Routing token shared by the main context and the output surface.

use serde::{Deserialize, Serialize};
use url::Url;

use showflow_ipc::OutputConfig;

use crate::OutputResult;

/// Which view a context renders, selected by the address fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    /// Operator dashboard.
    Dashboard,

    /// Full-screen output.
    Output,
}

impl ViewMode {
    /// Select the view for a fragment (without the leading `#`).
    pub fn from_fragment(fragment: Option<&str>, route: &str) -> Self {
        match fragment {
            Some(fragment) if fragment == route => Self::Output,
            _ => Self::Dashboard,
        }
    }

    /// Select the view for a full address.
    pub fn from_url(url: &Url, route: &str) -> Self {
        Self::from_fragment(url.fragment(), route)
    }
}

/// Everything needed to ask the host for an output surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRoute {
    /// Address of the output view.
    pub url: Url,

    /// Fragment that selects output mode.
    pub token: String,

    /// Surface name.
    pub window_name: String,

    /// Requested width in pixels.
    pub width: u32,

    /// Requested height in pixels.
    pub height: u32,
}

impl OutputRoute {
    /// Build the route from configuration.
    pub fn from_config(config: &OutputConfig) -> OutputResult<Self> {
        let mut url = Url::parse(&config.base_url)?;
        url.set_fragment(Some(&config.route));

        Ok(Self {
            url,
            token: config.route.clone(),
            window_name: config.window_name.clone(),
            width: config.width,
            height: config.height,
        })
    }

    /// View mode the route's own address selects.
    pub fn view_mode(&self) -> ViewMode {
        ViewMode::from_url(&self.url, &self.token)
    }

    /// Surface feature string in `width=W,height=H` form.
    pub fn features(&self) -> String {
        format!("width={},height={}", self.width, self.height)
    }
}
