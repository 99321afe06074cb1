//! Walk every key of the simulated controller and print its decoded value.

use smcprims::{SimulatedSmc, SmcClient};

fn main() -> Result<(), smcprims::SmcError> {
    let mut client = SmcClient::new(SimulatedSmc::demo());

    for value in client.keys()? {
        match value.decode() {
            Ok(decoded) => println!("{}  [{}]  {decoded}", value.key(), value.data_type()),
            Err(err) => println!("{}  [{}]  <{err}>", value.key(), value.data_type()),
        }
    }

    Ok(())
}
