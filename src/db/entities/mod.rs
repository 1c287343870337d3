pub mod album;
pub mod artist;
pub mod job;
pub mod load_history;
pub mod song;

pub use album::Entity as Album;
pub use artist::Entity as Artist;
pub use job::Entity as Job;
pub use load_history::Entity as LoadHistory;
pub use song::Entity as Song;
