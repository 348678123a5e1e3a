//! Board: client-side kanban state and its reconciliation with the project
//! service.
//!
//! ## Overview
//!
//! Columns are a local display preference persisted on this device; projects
//! live in the remote project service and are mirrored in memory. Each
//! project is shown in the column whose id equals its `status`. Moving a card
//! is nothing more than a status update sent through the sync adapter.
//!
//! ## Module Map
//!
//! ```text
//! ┌─────────────┐        ┌──────────────────────────────────────────────┐
//! │  CLI / UI   │ ─────> │  session.rs  (BoardSession)                  │
//! └─────────────┘        │     │  column actions        project actions │
//!                        │     v                               │          │
//!                        │  columns.rs ── storage.rs           v          │
//!                        │  (ColumnStore)  (FileStore)    sync.rs         │
//!                        │                                (SyncAdapter)   │
//!                        │  projects.rs                        │          │
//!                        │  (ProjectStore)                     v          │
//!                        │                                remote.rs       │
//!                        │  degrade.rs  <── failures ──   (HttpRemote)    │
//!                        │  (DegradationController)                       │
//!                        │                                                │
//!                        │  reconcile.rs  (group_by_column, DragState)    │
//!                        └──────────────────────────────────────────────┘
//! ```
//!
//! | Module      | Responsibility                                            |
//! |-------------|-----------------------------------------------------------|
//! | `storage`   | `KeyValueStore` trait, `FileStore`, `MemoryStore`         |
//! | `columns`   | Ordered column set, seeded with defaults, persisted       |
//! | `projects`  | In-memory project collection mirroring the service        |
//! | `remote`    | `ProjectRemote` trait and the HTTP client for the service |
//! | `sync`      | Timeout-bounded remote calls, local synthesis helpers     |
//! | `degrade`   | Per-operation state, fallback policy, user notice         |
//! | `reconcile` | Lane projection and drag-and-drop state                   |
//! | `session`   | `BoardSession`, the coordinator the rest of the app uses  |

pub mod columns;
pub mod degrade;
pub mod projects;
pub mod reconcile;
pub mod remote;
pub mod session;
pub mod storage;
pub mod sync;

pub use columns::{COLUMNS_KEY, ColumnStore, default_columns};
pub use degrade::{FallbackPolicy, Notice, NoticeLevel, OpKind, OpState};
pub use projects::ProjectStore;
pub use reconcile::{BoardView, DragState, Lane, group_by_column};
pub use remote::{HttpRemote, ProjectRemote};
pub use session::BoardSession;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use sync::SyncAdapter;
