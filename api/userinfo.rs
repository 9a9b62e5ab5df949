use shared::{userinfo, UserinfoConfig};
use vercel_runtime::{run, Body, Error, Request, Response};

#[tokio::main]
async fn main() -> Result<(), Error> {
    shared::logging::init();
    run(handler).await
}

pub async fn handler(req: Request) -> Result<Response<Body>, Error> {
    let config = UserinfoConfig::from_env();

    Ok(userinfo::handle(&req, config).await)
}
