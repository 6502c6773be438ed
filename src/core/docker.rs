//! # Run Command Builder / 运行命令构建器
//!
//! Turns an image, its mounts and the requested mode into the argument list
//! of a `docker run` invocation.
//!
//! 将镜像、其挂载和请求的模式转换为 `docker run` 调用的参数列表。

use crate::core::mounts::MountMap;
use crate::infra::command::Invocation;

/// The container runtime executable.
pub const DOCKER: &str = "docker";
/// Test entry point inside every test image.
pub const TEST_ENTRYPOINT: &str = "/usr/bin/run_tests.sh";
/// Command run instead of the tests in interactive mode.
pub const SHELL: &str = "bash";

/// Builds the `docker run` arguments (without the program name).
///
/// Layout: `run --rm -i [-t] (-v host:container)* image` followed by either
/// the shell, or `subcommand` and then `trailing_args` without its first
/// entry (the invoking command's own name).
///
/// # Arguments
/// * `image` - Image reference to run
/// * `mounts` - Volumes to bind, emitted in the map's order
/// * `interactive` - Start a shell instead of the tests
/// * `allocate_tty` - Pass `-t`
/// * `trailing_args` - Trailing arguments as received, first entry included
/// * `subcommand` - Entry point and product-specific tokens
///
/// 构建 `docker run` 参数（不含程序名）。
/// 布局：`run --rm -i [-t] (-v host:container)* image`，随后是 shell，
/// 或者是 `subcommand` 再加上去掉第一项（调用命令自身的名称）的 `trailing_args`。
pub fn build_run_command(
    image: &str,
    mounts: &MountMap,
    interactive: bool,
    allocate_tty: bool,
    trailing_args: &[String],
    subcommand: &[String],
) -> Vec<String> {
    let mut args: Vec<String> = vec!["run".into(), "--rm".into(), "-i".into()];
    if allocate_tty {
        args.push("-t".into());
    }
    for volume in mounts.volume_specs() {
        args.push("-v".into());
        args.push(volume);
    }
    args.push(image.to_string());

    if interactive {
        args.push(SHELL.into());
    } else {
        args.extend(subcommand.iter().cloned());
        args.extend(trailing_args.iter().skip(1).cloned());
    }
    args
}

/// Wraps [`build_run_command`] into an [`Invocation`] of the container runtime.
pub fn run_invocation(
    image: &str,
    mounts: &MountMap,
    interactive: bool,
    allocate_tty: bool,
    trailing_args: &[String],
    subcommand: &[String],
) -> Invocation {
    Invocation::new(DOCKER).args(build_run_command(
        image,
        mounts,
        interactive,
        allocate_tty,
        trailing_args,
        subcommand,
    ))
}

/// `docker images -q <reference>`: prints the image ID when the image exists.
pub fn images_query(reference: &str) -> Invocation {
    Invocation::new(DOCKER).args(["images", "-q", reference])
}
