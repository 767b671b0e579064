use crate::{GatewayError, session::GatewaySession};
use bot::ImageGenerator;
use derivative::Derivative;
use derive_setters::Setters;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::Notify};

#[non_exhaustive]
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
pub struct GatewayConfig {
    #[derivative(Default(value = "\"127.0.0.1:8787\".to_string()"))]
    #[setters(into)]
    pub address: String,

    #[derivative(Default(value = "\"/cartoonize\".to_string()"))]
    #[setters(into)]
    pub path: String,

    #[derivative(Default(value = "20 * 1024 * 1024"))]
    pub max_body_bytes: usize,

    /// Time a client gets to send the whole request.
    #[derivative(Default(value = "Duration::from_secs(30)"))]
    pub read_timeout: Duration,
}

pub struct GatewayServer {
    config: Arc<GatewayConfig>,
    listener: TcpListener,
    generator: Arc<dyn ImageGenerator>,
    exit_notify: Arc<Notify>,
}

impl GatewayServer {
    pub async fn bind(
        config: GatewayConfig,
        generator: Arc<dyn ImageGenerator>,
        exit_notify: Arc<Notify>,
    ) -> Result<Self, GatewayError> {
        let socket_addr: SocketAddr = config.address.parse()?;
        let listener = TcpListener::bind(socket_addr).await?;

        Ok(Self {
            config: Arc::new(config),
            listener,
            generator,
            exit_notify,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, GatewayError> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn run(self) -> Result<(), GatewayError> {
        log::info!(
            "Gateway listening on http://{}{}",
            self.local_addr()?,
            self.config.path
        );

        loop {
            tokio::select! {
                item = self.listener.accept() => {
                    match item {
                        Ok((tcp_stream, socket_addr)) => {
                            let mut session = GatewaySession::new(
                                tcp_stream,
                                socket_addr,
                                self.config.clone(),
                                self.generator.clone(),
                            );

                            tokio::spawn(async move {
                                if let Err(e) = session.run().await {
                                    log::warn!("session {socket_addr} failed: {e}");
                                }
                            });
                        }
                        Err(e) => {
                            log::warn!("Gateway accept failed: {e}");
                            return Err(GatewayError::IOError(e));
                        }
                    }
                }
                _ = self.exit_notify.notified() => {
                    log::info!("Gateway receive `exit notify`. exit...");
                    return Ok(());
                }
            }
        }
    }
}
