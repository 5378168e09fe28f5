use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use tiny_http::{Header, Method, Response, Server, StatusCode};
use ytcards_core::card::{CardError, CardRenderer, data_uri};
use ytcards_core::locale::LocaleTable;
use ytcards_core::params::{QueryParams, RenderParameters, ValidationError};

use crate::fetch::{FetchError, MediaSource};

const CACHE_SECONDS: i64 = 3600;
const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
const SVG_CONTENT_TYPE: &str = "image/svg+xml; charset=utf-8";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

type BoxedResponse = Response<Box<dyn Read + Send>>;

pub struct ServerOpts {
    pub host: String,
    pub port: u16,
}

pub struct ServerHandle {
    pub url: String,
    shutdown: Arc<AtomicBool>,
    join: JoinHandle<Result<()>>,
}

impl ServerHandle {
    pub fn stop(self) -> Result<()> {
        self.shutdown.store(true, Ordering::SeqCst);
        match self.join.join() {
            Ok(result) => result,
            Err(_) => anyhow::bail!("card server thread panicked"),
        }
    }
}

/// Everything a request needs besides the request itself.
pub struct CardService {
    renderer: CardRenderer,
    locales: LocaleTable,
    media: Arc<dyn MediaSource>,
}

impl CardService {
    pub fn new(media: Arc<dyn MediaSource>) -> Result<Self> {
        Ok(Self {
            renderer: CardRenderer::new().context("failed to initialize templates")?,
            locales: LocaleTable::embedded().context("failed to load locales")?,
            media,
        })
    }

    fn render_card(&self, query: &QueryParams, now: DateTime<Utc>) -> Result<String, Failure> {
        let params = RenderParameters::from_query(query)?;
        let thumbnail = self.media.thumbnail(&params.id)?;
        let views = match self.media.views(&params.id) {
            Ok(views) => views,
            Err(err) => {
                tracing::warn!(id = %params.id, error = %err, "view count unavailable");
                String::new()
            }
        };
        let locale = self.locales.resolve(&params.lang);
        Ok(self.renderer.render_video(
            &params,
            locale,
            &views,
            data_uri(&thumbnail.bytes, &thumbnail.mime),
            now,
        )?)
    }
}

#[derive(Debug)]
struct Failure {
    status: u16,
    message: String,
}

impl From<ValidationError> for Failure {
    fn from(err: ValidationError) -> Self {
        Self {
            status: err.status,
            message: err.message,
        }
    }
}

impl From<FetchError> for Failure {
    fn from(err: FetchError) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl From<CardError> for Failure {
    fn from(err: CardError) -> Self {
        Self {
            status: 500,
            message: err.to_string(),
        }
    }
}

pub fn run_server(opts: ServerOpts, media: Arc<dyn MediaSource>) -> Result<()> {
    let service = CardService::new(media)?;
    let (server, addr) = bind_server(&opts.host, opts.port)?;
    let url = server_url(&opts.host, addr);
    tracing::info!(%url, "serving cards");
    serve_loop(server, service, None)
}

pub fn spawn_server(opts: ServerOpts, media: Arc<dyn MediaSource>) -> Result<ServerHandle> {
    let service = CardService::new(media)?;
    let (server, addr) = bind_server(&opts.host, opts.port)?;
    let url = server_url(&opts.host, addr);
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_thread = shutdown.clone();
    let join = thread::spawn(move || serve_loop(server, service, Some(shutdown_thread)));

    Ok(ServerHandle {
        url,
        shutdown,
        join,
    })
}

fn bind_server(host: &str, port: u16) -> Result<(Server, SocketAddr)> {
    let addr = format!("{host}:{port}");
    let server =
        Server::http(&addr).map_err(|err| anyhow!("failed to bind to {addr}: {err}"))?;
    let actual = server
        .server_addr()
        .to_ip()
        .ok_or_else(|| anyhow!("failed to resolve socket address"))?;
    Ok((server, actual))
}

fn server_url(host: &str, addr: SocketAddr) -> String {
    format!("http://{host}:{}/", addr.port())
}

fn serve_loop(
    server: Server,
    service: CardService,
    shutdown: Option<Arc<AtomicBool>>,
) -> Result<()> {
    loop {
        if let Some(flag) = &shutdown {
            if flag.load(Ordering::SeqCst) {
                break;
            }
        }

        let request = match server.recv_timeout(Duration::from_millis(200)) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(err) => return Err(err.into()),
        };

        let now = Utc::now();
        let response = match handle_request(&request, &service, now) {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "request failed");
                Response::from_string("Internal Server Error")
                    .with_status_code(StatusCode(500))
                    .boxed()
            }
        };
        tracing::debug!(
            method = %request.method(),
            url = request.url(),
            status = response.status_code().0,
            "handled request"
        );

        if let Err(err) = request.respond(response) {
            tracing::warn!(error = %err, "failed to send response");
        }
    }
    Ok(())
}

fn handle_request(
    request: &tiny_http::Request,
    service: &CardService,
    now: DateTime<Utc>,
) -> Result<BoxedResponse> {
    let method = request.method();
    if method != &Method::Get && method != &Method::Head {
        return Ok(Response::from_string("Method Not Allowed")
            .with_status_code(StatusCode(405))
            .boxed());
    }

    let (path, query) = request
        .url()
        .split_once('?')
        .unwrap_or((request.url(), ""));
    if path != "/" {
        return Ok(Response::from_string("Not Found")
            .with_status_code(StatusCode(404))
            .boxed());
    }

    let query = QueryParams::parse(query);
    let (status, content_type, body) = if !query.contains("id") {
        let html = service.renderer.render_index(now)?;
        (200, HTML_CONTENT_TYPE, html)
    } else {
        match service.render_card(&query, now) {
            Ok(svg) => (200, SVG_CONTENT_TYPE, svg),
            Err(failure) => {
                tracing::info!(status = failure.status, message = %failure.message, "rendering error card");
                let svg = service
                    .renderer
                    .render_error(&failure.message, failure.status)?;
                (failure.status, SVG_CONTENT_TYPE, svg)
            }
        }
    };

    let mut response = if method == &Method::Head {
        Response::empty(status).boxed()
    } else {
        Response::from_data(body.into_bytes())
            .with_status_code(StatusCode(status))
            .boxed()
    };
    response.add_header(header("Content-Type", content_type)?);
    for (name, value) in cache_headers(now) {
        response.add_header(header(name, &value)?);
    }
    Ok(response)
}

/// One-hour public caching, relative to `now`.
pub fn cache_headers(now: DateTime<Utc>) -> [(&'static str, String); 3] {
    let expires = now + chrono::Duration::seconds(CACHE_SECONDS);
    [
        ("Expires", expires.format(HTTP_DATE).to_string()),
        ("Last-Modified", now.format(HTTP_DATE).to_string()),
        ("Cache-Control", format!("public, max-age={CACHE_SECONDS}")),
    ]
}

fn header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name, value).map_err(|_| anyhow!("invalid header {name}: {value}"))
}
