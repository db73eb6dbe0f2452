use anyhow::{Context, bail};
use core::time::Duration;
use snowleaf::{
    Error, IdGenerator, InterruptibleSleep, RandSource, SleepProvider, SnowflakeId, TimeSource,
};
use std::io::Write;

/// Writes up to `count` IDs to `out`, one per line, and returns how many were
/// written.
///
/// Stops early, without error, once `stop` is interrupted; a regression wait
/// cut short by the same signal ends the run the same way. Any other
/// generator failure aborts the run.
pub fn generate<T, R, S, W>(
    generator: &IdGenerator<T, R, S>,
    count: u64,
    stop: &InterruptibleSleep,
    out: &mut W,
) -> anyhow::Result<u64>
where
    T: TimeSource,
    R: RandSource,
    S: SleepProvider,
    W: Write,
{
    let mut issued = 0;
    while issued < count && !stop.is_interrupted() {
        match generator.next_id() {
            Ok(id) => {
                writeln!(out, "{id}")?;
                issued += 1;
            }
            Err(Error::WaitInterrupted) => break,
            Err(e) => {
                out.flush()?;
                return Err(e).with_context(|| format!("failed after {issued} IDs"));
            }
        }
    }
    out.flush()?;
    Ok(issued)
}

/// Renders the fields of `raw`, resolving the timestamp against `epoch`.
pub fn decode(raw: u64, epoch: Duration) -> anyhow::Result<String> {
    let id = SnowflakeId::from_raw(raw);
    if !id.is_valid() {
        bail!("{raw} has the reserved bit set and is not a snowflake ID");
    }

    Ok(format!(
        "id:        {id}\n\
         timestamp: {}\n\
         worker_id: {}\n\
         sequence:  {}\n\
         unix_ms:   {}",
        id.timestamp(),
        id.worker_id(),
        id.sequence(),
        id.unix_millis(epoch),
    ))
}
