use std::future::{ready, Ready};
use std::io::Write;
use std::time::Instant;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error,
};
use env_logger::Builder;
use futures_util::future::LocalBoxFuture;
use log::{error, info, warn, Level};
use uuid::Uuid;

/// Logs every request with its status and latency. Guest claims are logged
/// with the gift they targeted, so a lost race can be traced per gift.
pub struct LoggerMiddleware;

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = LoggerMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggerMiddlewareService { service }))
    }
}

pub struct LoggerMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let line = format!("{} {}", req.method(), req.path());
        let claimed = claimed_gift(req.method().as_str(), req.path());
        let started = Instant::now();
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await;
            let status = match &res {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            let millis = started.elapsed().as_millis();
            match claimed {
                Some(gift_id) if status == StatusCode::CONFLICT => {
                    info!("{} -> {} in {}ms: gift {} already taken", line, status, millis, gift_id)
                }
                Some(gift_id) => info!("{} -> {} in {}ms: claim on gift {}", line, status, millis, gift_id),
                None if status.is_server_error() => error!("{} -> {} in {}ms", line, status, millis),
                None if status.is_client_error() => warn!("{} -> {} in {}ms", line, status, millis),
                None => info!("{} -> {} in {}ms", line, status, millis),
            }
            res
        })
    }
}

/// The gift id of a `POST /gifts/{id}/reserve` request.
fn claimed_gift(method: &str, path: &str) -> Option<Uuid> {
    if method != "POST" {
        return None;
    }
    let id = path.strip_prefix("/gifts/")?.strip_suffix("/reserve")?;
    Uuid::parse_str(id).ok()
}

/// Installs the global logger. Level filtering follows `RUST_LOG`,
/// defaulting to `info`.
pub fn init_logger() {
    Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            let color = match record.level() {
                Level::Error => "\x1b[31;1m",
                Level::Warn => "\x1b[33;1m",
                Level::Info => "\x1b[32;1m",
                Level::Debug => "\x1b[34;1m",
                Level::Trace => "\x1b[35;1m",
            };
            writeln!(
                buf,
                "{}{} [{}] - {}\x1b[0m",
                color,
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init()
}
