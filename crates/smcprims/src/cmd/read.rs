use smcprims_client::SmcClient;
use smcprims_codec::Key;
use smcprims_transport::Transport;

use crate::cmd::ReadArgs;
use crate::exit::{codec_error, smc_error, CliResult, SUCCESS};
use crate::output::{print_value, OutputFormat};

pub fn run<T: Transport>(
    client: &mut SmcClient<T>,
    args: ReadArgs,
    format: OutputFormat,
) -> CliResult<i32> {
    let key: Key = args
        .key
        .parse()
        .map_err(|e| codec_error("parse key", e))?;
    let value = client
        .read_key(key)
        .map_err(|e| smc_error(&format!("read {key}"), e))?;
    print_value(&value, format);
    Ok(SUCCESS)
}
