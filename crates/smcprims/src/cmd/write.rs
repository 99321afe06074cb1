use smcprims_client::SmcClient;
use smcprims_codec::{parse_hex_payload, Key, Value};
use smcprims_transport::Transport;

use crate::cmd::WriteArgs;
use crate::exit::{codec_error, smc_error, CliResult, SUCCESS};
use crate::output::{print_written, OutputFormat};

pub fn run<T: Transport>(
    client: &mut SmcClient<T>,
    args: WriteArgs,
    format: OutputFormat,
) -> CliResult<i32> {
    let key: Key = args
        .key
        .parse()
        .map_err(|e| codec_error("parse key", e))?;
    let data = parse_hex_payload(&args.data).map_err(|e| codec_error("parse payload", e))?;
    let value = Value::raw(key, &data).map_err(|e| codec_error("build value", e))?;

    client
        .write_key(&value)
        .map_err(|e| smc_error(&format!("write {key}"), e))?;
    print_written(&value, format);
    Ok(SUCCESS)
}
