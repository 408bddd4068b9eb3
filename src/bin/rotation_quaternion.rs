use anyhow::Result;

#[cfg(feature = "cli")]
mod main {
    use super::*;
    use anyhow::Context;
    use clap::{Args, Parser, Subcommand};
    use rotation_quaternion::{Quaternion, RotationMatrix};

    #[derive(Debug, Parser)]
    #[command(about = "Quaternion algebra and rotation matrix conversion", long_about = None)]
    struct Cli {
        #[command(subcommand)]
        command: Command,
    }

    #[derive(Debug, Subcommand)]
    enum Command {
        /// Print the results of all operations for two example quaternions
        Demo {
            /// Components (w,x,y,z) of the first quaternion
            #[arg(
                long,
                value_delimiter = ',',
                allow_negative_numbers = true,
                default_values_t = [1.0, 2.0, 3.0, 4.0]
            )]
            first: Vec<f64>,

            /// Components (w,x,y,z) of the second quaternion
            #[arg(
                long,
                value_delimiter = ',',
                allow_negative_numbers = true,
                default_values_t = [5.0, 6.0, 7.0, 8.0]
            )]
            second: Vec<f64>,
        },
        /// Print the rotation matrix corresponding to a quaternion
        ToMatrix(QuaternionArgs),
        /// Print the quaternion corresponding to a row-major rotation matrix
        FromMatrix {
            /// The nine matrix elements, row by row
            #[arg(num_args = 9, allow_negative_numbers = true)]
            elements: Vec<f64>,
        },
        /// Print the multiplicative inverse of a quaternion
        Inverse(QuaternionArgs),
    }

    #[derive(Debug, Args)]
    struct QuaternionArgs {
        /// Real component
        #[arg(allow_negative_numbers = true)]
        w: f64,
        /// i component
        #[arg(allow_negative_numbers = true)]
        x: f64,
        /// j component
        #[arg(allow_negative_numbers = true)]
        y: f64,
        /// k component
        #[arg(allow_negative_numbers = true)]
        z: f64,
    }

    impl QuaternionArgs {
        fn quaternion(&self) -> Quaternion {
            Quaternion::new(self.w, self.x, self.y, self.z)
        }
    }

    pub fn main() -> Result<()> {
        env_logger::init();

        let cli = Cli::parse();
        log::info!("Running {:?}", cli.command);

        match cli.command {
            Command::Demo { first, second } => {
                let q1 = parse_quaternion(&first).context("Invalid first quaternion")?;
                let q2 = parse_quaternion(&second).context("Invalid second quaternion")?;
                run_demo(&q1, &q2)
            }
            Command::ToMatrix(args) => {
                println!("{}", args.quaternion().to_rotation_matrix());
                Ok(())
            }
            Command::FromMatrix { elements } => {
                let matrix = parse_matrix(&elements)?;
                if !matrix.is_rotation(1e-9) {
                    log::warn!("Matrix is not a proper rotation, result has no geometric meaning");
                }
                log::info!("Using {:?} branch", matrix.conversion_branch());
                println!("{}", Quaternion::from_rotation_matrix(&matrix));
                Ok(())
            }
            Command::Inverse(args) => {
                let quaternion = args.quaternion();
                let inverse = quaternion
                    .inverse()
                    .with_context(|| format!("Failed to invert {quaternion}"))?;
                println!("{inverse}");
                Ok(())
            }
        }
    }

    fn run_demo(q1: &Quaternion, q2: &Quaternion) -> Result<()> {
        println!("q1 + q2: {}", q1 + q2);
        println!("q1 - q2: {}", q1 - q2);
        println!("q1 * q2: {}", q1 * q2);

        println!("Norm of q1: {}", q1.norm());
        println!("Conjugate of q1: {}", q1.conjugate());
        println!("Inverse of q1: {}", q1.inverse()?);

        let rotation_matrix = q1.to_rotation_matrix();
        println!("Rotation Matrix:");
        println!("{rotation_matrix}");

        println!(
            "Quaternion from Rotation Matrix: {}",
            Quaternion::from_rotation_matrix(&rotation_matrix)
        );
        Ok(())
    }

    fn parse_quaternion(components: &[f64]) -> Result<Quaternion> {
        let components: [f64; 4] = components
            .try_into()
            .with_context(|| format!("Expected 4 components, got {}", components.len()))?;
        Ok(Quaternion::from(components))
    }

    fn parse_matrix(elements: &[f64]) -> Result<RotationMatrix> {
        let [m00, m01, m02, m10, m11, m12, m20, m21, m22]: [f64; 9] = elements
            .try_into()
            .with_context(|| format!("Expected 9 matrix elements, got {}", elements.len()))?;
        Ok(RotationMatrix::from_rows([
            [m00, m01, m02],
            [m10, m11, m12],
            [m20, m21, m22],
        ]))
    }
}

#[cfg(not(feature = "cli"))]
mod main {
    use super::*;

    pub fn main() -> Result<()> {
        anyhow::bail!("This binary requires the `cli` feature to be enabled.")
    }
}

fn main() -> Result<()> {
    main::main()
}
