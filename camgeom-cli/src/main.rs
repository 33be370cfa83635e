mod export;
mod io;

use camgeom_pinhole::{commutativity, CameraSettings};
use io::CliError;
use log::*;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Clone)]
#[structopt(
    name = "camgeom",
    about = "A tool to project points through a pinhole camera and back"
)]
struct Opt {
    /// The file where camera settings are specified.
    ///
    /// This is in the format of `camgeom_pinhole::CameraSettings`. Missing fields and a
    /// missing file fall back to the defaults.
    #[structopt(short, long, parse(from_os_str))]
    settings: Option<PathBuf>,
    /// The focal length
    #[structopt(long, allow_hyphen_values = true)]
    focal: Option<f64>,
    /// The x coordinate of the principal point
    #[structopt(long, allow_hyphen_values = true)]
    principal_x: Option<f64>,
    /// The y coordinate of the principal point
    #[structopt(long, allow_hyphen_values = true)]
    principal_y: Option<f64>,
    /// The x component of the translation
    #[structopt(long, allow_hyphen_values = true)]
    translation_x: Option<f64>,
    /// The y component of the translation
    #[structopt(long, allow_hyphen_values = true)]
    translation_y: Option<f64>,
    /// The z component of the translation
    #[structopt(long, allow_hyphen_values = true)]
    translation_z: Option<f64>,
    /// Degrees of rotation about the x axis
    #[structopt(long, allow_hyphen_values = true)]
    rotation_x: Option<f64>,
    /// Degrees of rotation about the y axis
    #[structopt(long, allow_hyphen_values = true)]
    rotation_y: Option<f64>,
    /// Degrees of rotation about the z axis
    #[structopt(long, allow_hyphen_values = true)]
    rotation_z: Option<f64>,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt, Clone)]
enum Command {
    /// Project 3d world points onto the image.
    Project {
        /// JSON file with the world points as three rows.
        #[structopt(parse(from_os_str))]
        input: PathBuf,
        /// Where to write the image points (stdout if not set).
        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
        /// Where to write the camera depth of every point.
        #[structopt(short, long, parse(from_os_str))]
        depths: Option<PathBuf>,
    },
    /// Recover 3d world points from image points and their depths.
    Unproject {
        /// JSON file with the image points as two rows.
        #[structopt(parse(from_os_str))]
        points: PathBuf,
        /// JSON file with one depth per image point.
        #[structopt(parse(from_os_str))]
        depths: PathBuf,
        /// Where to write the world points (stdout if not set).
        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
        /// Output PLY file to deposit the recovered point cloud
        #[structopt(long, parse(from_os_str))]
        ply: Option<PathBuf>,
    },
    /// Print the projection and extrinsic matrices of the configured camera.
    Describe,
}

impl Opt {
    /// Loads the settings file if there is one and applies the overrides from the command line.
    fn camera_settings(&self) -> Result<CameraSettings, CliError> {
        let settings = io::load_settings(self.settings.as_deref())?;
        Ok(self.apply_overrides(settings))
    }

    /// Replaces every field of `settings` that was given on the command line.
    fn apply_overrides(&self, mut settings: CameraSettings) -> CameraSettings {
        let CameraSettings {
            principal_point: [principal_x, principal_y],
            focal,
            translation: [translation_x, translation_y, translation_z],
            rotation_x,
            rotation_y,
            rotation_z,
        } = &mut settings;
        let overrides = [
            (self.focal, focal),
            (self.principal_x, principal_x),
            (self.principal_y, principal_y),
            (self.translation_x, translation_x),
            (self.translation_y, translation_y),
            (self.translation_z, translation_z),
            (self.rotation_x, rotation_x),
            (self.rotation_y, rotation_y),
            (self.rotation_z, rotation_z),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
        settings
    }
}

fn run(opt: Opt) -> Result<(), CliError> {
    let settings = opt.camera_settings()?;
    if settings.focal == 0.0 {
        warn!("the focal length is zero, so the projection cannot be inverted");
    }
    let camera = settings.camera();

    match opt.command {
        Command::Project {
            input,
            output,
            depths,
        } => {
            let world = io::load_points(&input, "world points", 3)?;
            info!("projecting {} world points", world.len());
            let image = camera.project(&world)?;
            io::write_json(output.as_deref(), &image)?;
            if let Some(path) = depths {
                let depths = camera.depths(&world)?;
                io::write_json(Some(path.as_path()), &depths.as_slice())?;
            }
        }
        Command::Unproject {
            points,
            depths,
            output,
            ply,
        } => {
            let image = io::load_points(&points, "image points", 2)?;
            let depths = io::load_depths(&depths)?;
            info!("unprojecting {} image points", image.len());
            let world = camera.unproject(&image, &depths)?;
            io::write_json(output.as_deref(), &world)?;
            if let Some(path) = ply {
                info!("exporting the recovered points");
                export::export(io::create(&path)?, &world)?;
            }
        }
        Command::Describe => {
            println!("projection P = L * M:{}", camera.projection());
            println!("extrinsics M = Rz * Rx * Ry * T:{}", camera.extrinsics);
            let answer = commutativity();
            println!("commutativity: {} ({})", answer, answer.code());
        }
    }
    Ok(())
}

fn main() {
    pretty_env_logger::init_timed();
    let opt = Opt::from_args();
    if let Err(e) = run(opt) {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use camgeom_core::ProjectionError;
    use std::path::Path;

    fn opt(args: &[&str]) -> Opt {
        Opt::from_iter_safe(std::iter::once("camgeom").chain(args.iter().copied())).unwrap()
    }

    fn arg(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    #[test]
    fn flags_override_only_given_fields() {
        let opt = opt(&[
            "--focal",
            "2.5",
            "--principal-y",
            "-3",
            "--translation-x",
            "1",
            "--rotation-z",
            "-45",
            "describe",
        ]);
        let loaded = CameraSettings {
            focal: 100.0,
            rotation_x: 12.0,
            ..CameraSettings::default()
        };
        let settings = opt.apply_overrides(loaded);
        assert_eq!(
            settings,
            CameraSettings {
                focal: 2.5,
                principal_point: [8.0, -3.0],
                translation: [1.0, -2.9, -3.2],
                rotation_x: 12.0,
                rotation_z: -45.0,
                ..CameraSettings::default()
            }
        );
    }

    #[test]
    fn no_flags_leave_settings_alone() {
        let loaded = CameraSettings {
            focal: 3.0,
            principal_point: [1.0, 2.0],
            translation: [4.0, 5.0, 6.0],
            rotation_x: 7.0,
            rotation_y: 8.0,
            rotation_z: 9.0,
        };
        assert_eq!(opt(&["describe"]).apply_overrides(loaded), loaded);
    }

    #[test]
    fn flags_apply_on_top_of_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "focal": 2.5, "rotation_y": 10.0 }"#).unwrap();
        let settings = opt(&["--settings", arg(&path), "--rotation-y", "20", "describe"])
            .camera_settings()
            .unwrap();
        assert_eq!(settings.focal, 2.5);
        assert_eq!(settings.rotation_y, 20.0);
        assert_eq!(settings.rotation_z, CameraSettings::default().rotation_z);
    }

    #[test]
    fn missing_settings_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let settings = opt(&["--settings", arg(&path), "describe"])
            .camera_settings()
            .unwrap();
        assert_eq!(settings, CameraSettings::default());
    }

    #[test]
    fn malformed_settings_file_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "focal": 2.5, "rotation_z": }"#).unwrap();
        let result = run(opt(&["--settings", arg(&path), "describe"]));
        assert!(matches!(result, Err(CliError::Json(_))));
    }

    #[test]
    fn describe_succeeds() {
        assert!(run(opt(&["describe"])).is_ok());
    }

    #[test]
    fn project_then_unproject_recovers_world_points() {
        let dir = tempfile::tempdir().unwrap();
        let world = dir.path().join("world.json");
        let image = dir.path().join("image.json");
        let depths = dir.path().join("depths.json");
        let recovered = dir.path().join("recovered.json");
        let ply = dir.path().join("recovered.ply");
        std::fs::write(&world, "[[1.0, -4.0, 2.0], [2.0, 0.5, 7.0], [30.0, 12.0, -5.0]]").unwrap();

        run(opt(&[
            "project",
            arg(&world),
            "-o",
            arg(&image),
            "-d",
            arg(&depths),
        ]))
        .unwrap();
        let camera = CameraSettings::default().camera();
        let world_points = io::load_points(&world, "world points", 3).unwrap();
        let image_points = io::load_points(&image, "image points", 2).unwrap();
        assert_relative_eq!(
            image_points.0,
            camera.project(&world_points).unwrap().0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            io::load_depths(&depths).unwrap(),
            camera.depths(&world_points).unwrap(),
            epsilon = 1e-9
        );

        run(opt(&[
            "unproject",
            arg(&image),
            arg(&depths),
            "-o",
            arg(&recovered),
            "--ply",
            arg(&ply),
        ]))
        .unwrap();
        let recovered = io::load_points(&recovered, "world points", 3).unwrap();
        assert_relative_eq!(recovered.0, world_points.0, epsilon = 1e-9);
        let cloud = std::fs::read_to_string(&ply).unwrap();
        assert!(cloud.starts_with("ply"));
        assert!(cloud.contains("element vertex 3"));
    }

    #[test]
    fn zero_focal_cannot_unproject() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("image.json");
        let depths = dir.path().join("depths.json");
        std::fs::write(&image, "[[1.0], [2.0]]").unwrap();
        std::fs::write(&depths, "[3.0]").unwrap();
        let result = run(opt(&["--focal", "0", "unproject", arg(&image), arg(&depths)]));
        assert!(matches!(
            result,
            Err(CliError::Projection(ProjectionError::SingularMatrix { .. }))
        ));
    }

    #[test]
    fn wrong_world_dimension_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let world = dir.path().join("world.json");
        std::fs::write(&world, "[[1.0], [2.0]]").unwrap();
        let result = run(opt(&["project", arg(&world), "-o", arg(&dir.path().join("out.json"))]));
        assert!(matches!(
            result,
            Err(CliError::Projection(ProjectionError::ShapeMismatch {
                what: "world points",
                ..
            }))
        ));
    }
}
