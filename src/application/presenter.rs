// Outbound capability - hands render models to the presentation collaborator
use crate::domain::dashboard::RenderModel;

pub trait Presenter: Send + Sync {
    /// Must not block: called from the refresh loop and from tab selection.
    fn render(&self, model: RenderModel);
}
