use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::utils::validation;

/// The user-chosen file, captured at selection time.
#[derive(Debug, Clone, Serialize)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub mime: String,
    #[serde(skip)]
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        // Size is informational only; a file that cannot be stat'ed will
        // surface its real error from the read.
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let mime = validation::mime_for_path(path).to_string();

        Self {
            name,
            size,
            mime,
            path: path.to_path_buf(),
        }
    }
}

/// Single container for the mutable state of one intake lifecycle.
///
/// `progress` is written only by the progress simulator, `payload` only by
/// the read task, and `completed` only by the join-fire path. `generation`
/// identifies the lifecycle; tasks outliving their lifecycle compare it and
/// drop their result instead of touching fresh state.
#[derive(Debug, Default)]
pub struct LifecycleState {
    pub file: Option<SelectedFile>,
    pub progress: u8,
    pub payload: Option<String>,
    pub completed: bool,
    pub generation: u64,
}

impl LifecycleState {
    /// Begin a fresh lifecycle for `file`. Returns the new generation.
    pub fn begin(&mut self, file: SelectedFile) -> u64 {
        self.generation += 1;
        self.file = Some(file);
        self.progress = 0;
        self.payload = None;
        self.completed = false;
        self.generation
    }

    /// Return to the pre-selection state after a failed read. Bumps the
    /// generation so anything still running for the failed lifecycle stops.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.file = None;
        self.progress = 0;
        self.payload = None;
    }
}

/// Render-facing view of the widget.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeSnapshot {
    pub file: Option<SelectedFile>,
    pub progress: u8,
    pub is_dragging: bool,
    pub completed: bool,
}

impl IntakeSnapshot {
    pub const HELP_TEXT: &'static str = "Maximum file size 50 MB.";

    /// Prompt shown in the empty drop zone.
    pub fn prompt(signed_in: bool) -> &'static str {
        if signed_in {
            "Click to upload or drag and drop"
        } else {
            "Sign in to upload"
        }
    }

    /// Status line under the progress bar.
    pub fn status_text(&self) -> &'static str {
        if self.progress < 100 {
            "Analyzing Floor Plan..."
        } else {
            "Redirecting..."
        }
    }
}

/// State handed to the visualizer page once intake completes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VisualizerState {
    pub name: Option<String>,
    pub initial_image: Option<String>,
    pub initial_render: Option<String>,
}

impl VisualizerState {
    pub const SOURCE_LABEL: &'static str = "Source Image";
    pub const RENDER_LABEL: &'static str = "Rendered Image";

    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or("Untitled Project")
    }

    /// Image panes to render, in display order. Panes without content are
    /// omitted entirely.
    pub fn panes(&self) -> Vec<(&'static str, &str)> {
        let mut panes = Vec::new();
        if let Some(src) = self.initial_image.as_deref() {
            panes.push((Self::SOURCE_LABEL, src));
        }
        if let Some(rendered) = self.initial_render.as_deref() {
            panes.push((Self::RENDER_LABEL, rendered));
        }
        panes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_begin_resets_everything() {
        let mut state = LifecycleState {
            progress: 70,
            payload: Some("data:old".to_string()),
            completed: true,
            ..Default::default()
        };

        let generation = state.begin(SelectedFile::from_path(Path::new("plan.png")));

        assert_eq!(generation, 1);
        assert_eq!(state.progress, 0);
        assert!(state.payload.is_none());
        assert!(!state.completed);
        assert_eq!(state.file.as_ref().unwrap().name, "plan.png");
    }

    #[test]
    fn test_lifecycle_reset_invalidates_generation() {
        let mut state = LifecycleState::default();
        let generation = state.begin(SelectedFile::from_path(Path::new("plan.png")));
        state.reset();

        assert!(state.file.is_none());
        assert_eq!(state.progress, 0);
        assert_ne!(state.generation, generation);
    }

    #[test]
    fn test_prompt_depends_on_sign_in() {
        assert_eq!(IntakeSnapshot::prompt(true), "Click to upload or drag and drop");
        assert_eq!(IntakeSnapshot::prompt(false), "Sign in to upload");
    }

    #[test]
    fn test_status_text() {
        let mut snapshot = IntakeSnapshot {
            file: None,
            progress: 40,
            is_dragging: false,
            completed: false,
        };
        assert_eq!(snapshot.status_text(), "Analyzing Floor Plan...");

        snapshot.progress = 100;
        assert_eq!(snapshot.status_text(), "Redirecting...");
    }

    #[test]
    fn test_visualizer_title_fallback() {
        let state = VisualizerState::default();
        assert_eq!(state.title(), "Untitled Project");

        let named = VisualizerState {
            name: Some("Loft".to_string()),
            ..Default::default()
        };
        assert_eq!(named.title(), "Loft");
    }

    #[test]
    fn test_visualizer_panes_order() {
        let state = VisualizerState {
            name: None,
            initial_image: Some("data:a".to_string()),
            initial_render: Some("data:b".to_string()),
        };
        assert_eq!(
            state.panes(),
            vec![("Source Image", "data:a"), ("Rendered Image", "data:b")]
        );

        let source_only = VisualizerState {
            initial_image: Some("data:a".to_string()),
            ..Default::default()
        };
        assert_eq!(source_only.panes(), vec![("Source Image", "data:a")]);
    }
}
