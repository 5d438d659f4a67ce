use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("mcpose {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: mcpose");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "build_target: {}",
        option_env!("MCPOSE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "build_profile: {}",
        option_env!("MCPOSE_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!(
        "features: receiver={}, async={}, cli=true",
        cfg!(feature = "receiver"),
        cfg!(feature = "async")
    );
    println!("default_port: {}", mcpose_transport::DEFAULT_PORT);

    Ok(SUCCESS)
}
