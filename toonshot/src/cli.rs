use crate::{
    Action, Session, ToastStatus,
    config::{self, Config},
};
use anyhow::{Result, anyhow, bail};
use bot::{DispatchClient, DispatchConfig, StyleTag, Stylizer};
use camera::{CaptureState, MediaDevice};
use clap::{Args, Parser, Subcommand};
use image_effect::AdjustParam;
use std::path::PathBuf;

/// Turn a photo into a cartoon through a remote stylization endpoint.
#[derive(Parser, Debug)]
#[command(name = "toonshot", version)]
#[command(about = "Turn photos into cartoons")]
pub struct Cli {
    /// Config file to use instead of the platform config directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the available styles
    Styles,

    /// Convert an image file
    Convert(ConvertArgs),

    /// Take photos with the camera and convert one of them
    Camera(CameraArgs),
}

#[derive(Args, Debug, Default)]
pub struct ConvertArgs {
    /// PNG, JPEG or WebP image
    pub file: PathBuf,

    #[command(flatten)]
    pub adjust: AdjustArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Default)]
pub struct CameraArgs {
    /// Number of photos to take
    #[arg(long, default_value_t = 1)]
    pub shots: usize,

    /// Gallery index of the photo to convert
    #[arg(long, default_value_t = 0)]
    pub pick: usize,

    #[command(flatten)]
    pub adjust: AdjustArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Default)]
pub struct AdjustArgs {
    /// Brightness percentage, 0 to 200
    #[arg(long)]
    pub brightness: Option<u16>,

    /// Contrast percentage, 0 to 200
    #[arg(long)]
    pub contrast: Option<u16>,

    /// Saturation percentage, 0 to 200
    #[arg(long)]
    pub saturation: Option<u16>,
}

#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Style tag, see `toonshot styles`
    #[arg(long)]
    pub style: Option<String>,

    /// Directory for the downloaded cartoon
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Stylization endpoint URL
    #[arg(long, env = "TOONSHOT_ENDPOINT")]
    pub endpoint: Option<String>,
}

pub async fn run(cli: Cli) -> Result<()> {
    if let Command::Styles = cli.command {
        for style in StyleTag::all_styles() {
            println!("{:<12} {}", style.as_ref(), style.instruction());
        }
        return Ok(());
    }

    match &cli.config {
        Some(path) => config::init_with_path(path)?,
        None => config::init()?,
    }
    let conf = config::all();

    match cli.command {
        Command::Convert(args) => {
            let stylizer = dispatch_client(&conf, args.output.endpoint.clone());
            let mut session = Session::new(device(), stylizer, conf);
            convert(&mut session, args).await.map(|path| println!("{}", path.display()))
        }
        Command::Camera(args) => {
            let stylizer = dispatch_client(&conf, args.output.endpoint.clone());
            let mut session = Session::new(device(), stylizer, conf);
            camera(&mut session, args).await.map(|path| println!("{}", path.display()))
        }
        Command::Styles => Ok(()),
    }
}

pub async fn convert<D, S>(session: &mut Session<D, S>, args: ConvertArgs) -> Result<PathBuf>
where
    D: MediaDevice,
    S: Stylizer,
{
    step(session, Action::SelectFiles(vec![args.file])).await;
    if session.active().is_none() {
        bail!("no image loaded");
    }

    finish(session, args.adjust, args.output).await
}

pub async fn camera<D, S>(session: &mut Session<D, S>, args: CameraArgs) -> Result<PathBuf>
where
    D: MediaDevice,
    S: Stylizer,
{
    step(session, Action::StartCamera).await;
    if session.capture_state() != CaptureState::Streaming {
        bail!("camera did not start");
    }

    for _ in 0..args.shots {
        step(session, Action::CapturePhoto).await;
    }
    step(session, Action::StopCamera).await;

    let id = session
        .gallery()
        .get(args.pick)
        .map(|c| c.id.clone())
        .ok_or_else(|| anyhow!("no photo at gallery index {}", args.pick))?;
    step(session, Action::SelectCaptured(id)).await;
    if session.active().is_none() {
        bail!("no photo selected");
    }

    finish(session, args.adjust, args.output).await
}

async fn finish<D, S>(
    session: &mut Session<D, S>,
    adjust: AdjustArgs,
    output: OutputArgs,
) -> Result<PathBuf>
where
    D: MediaDevice,
    S: Stylizer,
{
    for (param, value) in [
        (AdjustParam::Brightness, adjust.brightness),
        (AdjustParam::Contrast, adjust.contrast),
        (AdjustParam::Saturation, adjust.saturation),
    ] {
        if let Some(value) = value {
            step(session, Action::SetAdjustment(param, value)).await;
            if session.adjustment().get(param) != value {
                bail!("{} {value} was not applied", param.name());
            }
        }
    }

    let style = StyleTag::resolve(output.style.as_deref());
    step(session, Action::SelectStyle(style)).await;

    step(session, Action::Submit).await;
    if session.result().is_none() {
        bail!("conversion failed");
    }

    let out_dir = output.out_dir.unwrap_or_else(|| {
        let save_dir = &session.config().download.save_dir;
        if save_dir.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(save_dir)
        }
    });
    step(session, Action::Download(out_dir)).await;

    session
        .last_download()
        .cloned()
        .ok_or_else(|| anyhow!("download failed"))
}

async fn step<D, S>(session: &mut Session<D, S>, action: Action)
where
    D: MediaDevice,
    S: Stylizer,
{
    session.handle(action).await;

    for toast in session.take_toasts() {
        match toast.status {
            ToastStatus::Warning => eprintln!("warning: {}", toast.message),
            _ => eprintln!("{}", toast.message),
        }
    }
}

fn dispatch_client(conf: &Config, endpoint: Option<String>) -> DispatchClient {
    let mut dispatch = DispatchConfig::default()
        .with_endpoint(endpoint.unwrap_or_else(|| conf.endpoint.url.clone()))
        .with_timeout_secs(conf.endpoint.timeout_secs);

    if !conf.endpoint.api_key.is_empty() {
        dispatch = dispatch.with_api_key(conf.endpoint.api_key.clone());
    }

    DispatchClient::new(dispatch)
}

#[cfg(not(feature = "native"))]
fn device() -> camera::UnsupportedDevice {
    log::debug!("built without the `native` feature, camera is unavailable");
    camera::UnsupportedDevice
}

#[cfg(feature = "native")]
fn device() -> camera::NativeDevice {
    camera::NativeDevice::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from([
            "toonshot",
            "convert",
            "photo.jpg",
            "--style",
            "anime",
            "--brightness",
            "120",
            "--out-dir",
            "/tmp/out",
        ])
        .unwrap();

        let Command::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.file, PathBuf::from("photo.jpg"));
        assert_eq!(args.adjust.brightness, Some(120));
        assert_eq!(args.adjust.contrast, None);
        assert_eq!(args.output.style.as_deref(), Some("anime"));
        assert_eq!(args.output.out_dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn test_parse_camera_defaults() {
        let cli = Cli::try_parse_from(["toonshot", "--config", "a.toml", "camera"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));

        let Command::Camera(args) = cli.command else {
            panic!("expected camera");
        };
        assert_eq!(args.shots, 1);
        assert_eq!(args.pick, 0);
    }
}
