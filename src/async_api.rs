use crate::metadata::LastModified;
use crate::rendering::TableImage;
use crate::roster::ClassSelector;
use crate::{Error, Result, Session};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Load(oneshot::Sender<Result<()>>),
    Select(ClassSelector, Option<oneshot::Sender<Result<()>>>),
    State(oneshot::Sender<ViewState>),
    Close(oneshot::Sender<()>),
}

/// What the page shows at one point in time.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub selector: ClassSelector,
    pub last_modified: Option<LastModified>,
    pub count: Option<usize>,
    pub url: Option<String>,
    pub image: Option<Arc<TableImage>>,
    pub live_resources: usize,
}

impl ViewState {
    fn of(session: &Session) -> Self {
        Self {
            selector: session.selector().clone(),
            last_modified: session.last_modified(),
            count: session.count(),
            url: session.current_url().map(str::to_string),
            image: session.current_image(),
            live_resources: session.registry().live_count(),
        }
    }
}

/// An async-friendly viewer backed by a dedicated worker thread.
///
/// The worker owns the [`Session`] and handles commands one at a time in
/// submission order, so two quick selector changes can never install their
/// images out of order.
#[derive(Clone)]
pub struct Viewer {
    cmd_tx: Sender<Command>,
}

fn worker_gone() -> Error {
    Error::Other("viewer worker has shut down".into())
}

impl Viewer {
    /// Build a session from `config` on the worker thread.
    #[cfg(feature = "http")]
    pub async fn new(config: Option<crate::ViewerConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();
        let (init_tx, init_rx) = oneshot::channel::<Result<Sender<Command>>>();

        thread::spawn(move || {
            let session = match crate::new_session(config) {
                Ok(s) => s,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };
            let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
            let _ = init_tx.send(Ok(cmd_tx));
            run(session, cmd_rx);
        });

        let cmd_tx = init_rx.await.map_err(|_| worker_gone())??;
        Ok(Self { cmd_tx })
    }

    /// Move an existing session onto a worker thread.
    pub fn spawn(session: Session) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        thread::spawn(move || run(session, cmd_rx));
        Self { cmd_tx }
    }

    /// Fetch data and render the current selector.
    pub async fn load(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx.send(Command::Load(tx)).map_err(|_| worker_gone())?;
        rx.await.map_err(|_| worker_gone())?
    }

    /// Change the selector and wait until the new frame is installed.
    pub async fn select(&self, selector: ClassSelector) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Select(selector, Some(tx)))
            .map_err(|_| worker_gone())?;
        rx.await.map_err(|_| worker_gone())?
    }

    /// Queue a selector change without waiting for the render.
    pub fn submit(&self, selector: ClassSelector) -> Result<()> {
        self.cmd_tx
            .send(Command::Select(selector, None))
            .map_err(|_| worker_gone())
    }

    pub async fn state(&self) -> Result<ViewState> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx.send(Command::State(tx)).map_err(|_| worker_gone())?;
        rx.await.map_err(|_| worker_gone())
    }

    /// Stop the worker and drop the session with every resource it holds.
    pub async fn close(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx.send(Command::Close(tx)).map_err(|_| worker_gone())?;
        rx.await.map_err(|_| worker_gone())
    }
}

fn run(mut session: Session, cmd_rx: mpsc::Receiver<Command>) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            Command::Load(resp) => {
                let _ = resp.send(session.load());
            }
            Command::Select(selector, resp) => {
                let res = session.select(selector);
                if let Some(resp) = resp {
                    let _ = resp.send(res);
                }
            }
            Command::State(resp) => {
                let _ = resp.send(ViewState::of(&session));
            }
            Command::Close(resp) => {
                drop(session);
                let _ = resp.send(());
                return;
            }
        }
    }
}
