//! Language server adapter.
//!
//! [`ExtendedServer`] puts the extended requests and workspace module
//! management in front of a base [`Engine`]. Blocking work (type checker
//! calls, folder scans, the go command, repository lookups) never runs on
//! the dispatch path.

pub mod session;

use std::net::SocketAddr;
use std::sync::{Arc, RwLock};

use serde_json::{json, Value};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_lsp::jsonrpc::{self, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, ClientSocket, LanguageServer, LspService, Server};
use tracing::{debug, error, info};

use crate::core::{Engine, FullParams, FullResponse, SymbolLocator};
use crate::ops::{ExtendedHandlers, Extensions};
use crate::resolver::{PackageResolver, ResolveError, VcsRepoRoots};
use crate::util::{Config, GoEnv};

pub use session::Session;

/// Method name of the extended definition request.
pub const EDEFINITION_METHOD: &str = "textDocument/edefinition";

/// Method name of the full symbol request.
pub const FULL_METHOD: &str = "textDocument/full";

fn internal_error(message: String) -> jsonrpc::Error {
    let mut err = jsonrpc::Error::internal_error();
    err.message = message.into();
    err
}

fn join_error(e: tokio::task::JoinError) -> jsonrpc::Error {
    internal_error(format!("request task failed: {}", e))
}

fn resolve_error(e: ResolveError) -> jsonrpc::Error {
    internal_error(format!("{:#}", anyhow::Error::from(e)))
}

fn extensions<E: Engine>(engine: Arc<E>, env: GoEnv, config: &Config) -> Arc<Extensions<E>> {
    let repo_roots = Arc::new(VcsRepoRoots::new(config.remote_repo_lookup));
    Arc::new(Extensions::new(engine, PackageResolver::new(env, repo_roots)))
}

/// The language server.
pub struct ExtendedServer<E> {
    client: Client,
    env: GoEnv,
    session: Arc<Session>,
    handlers: RwLock<Arc<Extensions<E>>>,
}

impl<E: Engine> ExtendedServer<E> {
    pub fn new(client: Client, engine: Arc<E>, session: Arc<Session>, env: GoEnv) -> Self {
        let handlers = extensions(engine, env.clone(), &session.config());
        ExtendedServer {
            client,
            env,
            session,
            handlers: RwLock::new(handlers),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn handlers(&self) -> Arc<Extensions<E>> {
        self.handlers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Rebuild the handlers after a settings change.
    fn reload_handlers(&self) {
        let engine = self.handlers().engine().clone();
        let handlers = extensions(engine, self.env.clone(), &self.session.config());
        *self.handlers.write().unwrap_or_else(|e| e.into_inner()) = handlers;
    }

    /// Run module management for `folders` off the dispatch path.
    fn spawn_manage_deps(&self, folders: Vec<WorkspaceFolder>, options: Option<Value>) -> JoinHandle<()> {
        let session = self.session.clone();
        let client = self.client.clone();
        tokio::spawn(async move {
            let count = folders.len();
            let result = tokio::task::spawn_blocking(move || {
                session.manage_deps(folders, options.as_ref())
            })
            .await;
            match result {
                Ok(managed) => {
                    info!("managed {} folders, {} in total", count, managed.len());
                    client
                        .log_message(
                            MessageType::INFO,
                            format!("{} workspace folders under module management", managed.len()),
                        )
                        .await;
                }
                Err(e) => error!("module management task failed: {}", e),
            }
        })
    }

    /// `textDocument/edefinition`
    ///
    /// An identifier that cannot be resolved yields an empty list rather
    /// than an error.
    pub async fn edefinition(&self, params: TextDocumentPositionParams) -> Result<Vec<SymbolLocator>> {
        let handlers = self.handlers();
        let result = tokio::task::spawn_blocking(move || handlers.edefinition(&params))
            .await
            .map_err(join_error)?;

        match result {
            Ok(locators) => Ok(locators),
            Err(e @ ResolveError::Unresolved { .. }) => {
                debug!("{}", e);
                Ok(Vec::new())
            }
            Err(e) => Err(resolve_error(e)),
        }
    }

    /// `textDocument/full`
    pub async fn full(&self, params: FullParams) -> Result<FullResponse> {
        let handlers = self.handlers();
        tokio::task::spawn_blocking(move || handlers.full(&params))
            .await
            .map_err(join_error)?
            .map_err(resolve_error)
    }
}

#[tower_lsp::async_trait]
impl<E: Engine> LanguageServer for ExtendedServer<E> {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("initializing xrepo");

        if let Some(folders) = params.workspace_folders {
            self.session.add_folders(&folders);
        } else if let Some(root_uri) = params.root_uri {
            let name = root_uri
                .path_segments()
                .and_then(|mut s| s.next_back().map(str::to_string))
                .unwrap_or_default();
            self.session.add_folders(&[WorkspaceFolder { uri: root_uri, name }]);
        }

        self.session
            .set_initialization_options(params.initialization_options);
        self.reload_handlers();

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                definition_provider: Some(OneOf::Left(true)),
                document_symbol_provider: Some(OneOf::Left(true)),
                workspace: Some(WorkspaceServerCapabilities {
                    workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                        supported: Some(true),
                        change_notifications: Some(OneOf::Left(true)),
                    }),
                    file_operations: None,
                }),
                experimental: Some(json!({
                    "edefinitionProvider": true,
                    "fullProvider": true,
                })),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: String::from("xrepo"),
                version: Some(String::from(env!("CARGO_PKG_VERSION"))),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let folders = self.session.folders();
        info!("xrepo initialized with {} workspace folders", folders.len());
        self.spawn_manage_deps(folders, self.session.initialization_options());
    }

    async fn shutdown(&self) -> Result<()> {
        let session = self.session.clone();
        tokio::task::spawn_blocking(move || session.cleanup())
            .await
            .map_err(join_error)
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        let event = params.event;
        self.session.remove_folders(&event.removed);
        if event.added.is_empty() {
            return;
        }
        self.session.add_folders(&event.added);
        self.spawn_manage_deps(event.added, None);
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.session.set_workspace_settings(&params.settings);
        self.reload_handlers();
    }

    async fn goto_definition(&self, params: GotoDefinitionParams) -> Result<Option<GotoDefinitionResponse>> {
        let engine = self.handlers().engine().clone();
        let position = params.text_document_position_params;
        let ident = tokio::task::spawn_blocking(move || {
            engine.identifier_at(&position.text_document.uri, position.position)
        })
        .await
        .map_err(join_error)?;

        let Ok(ident) = ident else {
            return Ok(None);
        };
        let decl = ident.declaration;
        Ok(Url::from_file_path(&decl.file)
            .ok()
            .map(|uri| GotoDefinitionResponse::Scalar(Location::new(uri, decl.range))))
    }

    async fn document_symbol(&self, params: DocumentSymbolParams) -> Result<Option<DocumentSymbolResponse>> {
        let engine = self.handlers().engine().clone();
        let uri = params.text_document.uri;
        let outline = tokio::task::spawn_blocking(move || engine.document_symbols(&uri))
            .await
            .map_err(join_error)?
            .map_err(|e| internal_error(format!("{:#}", e)))?;
        Ok(Some(DocumentSymbolResponse::Nested(outline)))
    }
}

/// Build the service for one client, with the extended methods registered.
pub fn service<E: Engine>(
    engine: Arc<E>,
    session: Arc<Session>,
    env: GoEnv,
) -> (LspService<ExtendedServer<E>>, ClientSocket) {
    LspService::build(move |client| ExtendedServer::new(client, engine, session, env))
        .custom_method(EDEFINITION_METHOD, ExtendedServer::edefinition)
        .custom_method(FULL_METHOD, ExtendedServer::full)
        .finish()
}

/// Serve one client on a pair of byte streams.
///
/// The session is cleaned up once the client goes away, whether or not it
/// sent a shutdown request.
pub async fn serve_connection<E, I, O>(input: I, output: O, engine: Arc<E>, session: Arc<Session>, env: GoEnv)
where
    E: Engine,
    I: AsyncRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let (service, socket) = service(engine, session.clone(), env);
    Server::new(input, output, socket).serve(service).await;

    if let Err(e) = tokio::task::spawn_blocking(move || session.cleanup()).await {
        error!("session cleanup failed: {}", e);
    }
}

/// Serve a single client over stdin and stdout.
pub async fn serve_stdio<E: Engine>(engine: Arc<E>, session: Arc<Session>, env: GoEnv) {
    serve_connection(tokio::io::stdin(), tokio::io::stdout(), engine, session, env).await;
}

/// Accept clients on `addr`, one session per connection.
pub async fn serve_tcp<E, F>(addr: SocketAddr, config: Config, env: GoEnv, engine: F) -> anyhow::Result<()>
where
    E: Engine,
    F: Fn() -> Arc<E>,
{
    let listener = TcpListener::bind(addr).await?;
    serve_listener(listener, env, move || (engine(), Arc::new(Session::new(config.clone())))).await
}

/// Accept clients on a bound listener. `connect` supplies the engine and a
/// fresh session for each connection.
pub async fn serve_listener<E, F>(listener: TcpListener, env: GoEnv, connect: F) -> anyhow::Result<()>
where
    E: Engine,
    F: Fn() -> (Arc<E>, Arc<Session>),
{
    info!("listening on {}", listener.local_addr()?);

    loop {
        let (stream, peer) = listener.accept().await?;
        debug!("connection from {}", peer);

        let (engine, session) = connect();
        let env = env.clone();
        let (read, write) = stream.into_split();
        tokio::spawn(async move {
            serve_connection(read, write, engine, session, env).await;
            debug!("connection from {} closed", peer);
        });
    }
}
