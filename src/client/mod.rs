mod api;
mod effect;
mod msg;
mod persistence;
pub mod render;
mod session;
mod state;
mod typing;
mod update;
mod view_model;

pub use api::{ClientError, ProductivityApi, ProductivityBackend};
pub use effect::Effect;
pub use msg::Msg;
pub use persistence::{FileStore, MemoryStore, PersistError, StateStore, STATE_KEY};
pub use session::{PendingRequest, Session};
pub use state::{ClientSnapshot, ClientState, Phase};
pub use typing::{Frame, Typewriter, CHAR_INTERVAL};
pub use update::update;
pub use view_model::{Body, ClientViewModel};
