use smcprims_client::SmcClient;
use smcprims_codec::Value;
use smcprims_transport::Transport;

use crate::cmd::ListArgs;
use crate::exit::{smc_error, CliResult, SUCCESS};
use crate::output::{print_values, OutputFormat};

pub fn run<T: Transport>(
    client: &mut SmcClient<T>,
    args: ListArgs,
    format: OutputFormat,
) -> CliResult<i32> {
    let walk = client.keys().map_err(|e| smc_error("read key count", e))?;
    let total = walk.count_snapshot();
    let values: Vec<Value> = walk.take(args.limit.unwrap_or(usize::MAX)).collect();

    tracing::info!(total, listed = values.len(), "key walk complete");
    print_values(&values, format);
    Ok(SUCCESS)
}
