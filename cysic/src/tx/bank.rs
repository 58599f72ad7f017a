//! Messages for the [Bank module](https://github.com/cosmos/cosmos-sdk/blob/main/proto/cosmos/bank/v1beta1/tx.proto).
use crate::{
    address::AddressCodec,
    coin::{sum_by_denom, Coin},
    cosmos_modules::base,
    error::MsgError,
};

use super::{check_account, check_coins, ModuleMsg};

pub use crate::cosmos_modules::bank::{Input, MsgMultiSend, MsgSend, Output};

impl ModuleMsg for MsgSend {
    const TYPE_URL: &'static str = "/cosmos.bank.v1beta1.MsgSend";

    fn validate_basic(&self, codec: &AddressCodec) -> Result<(), MsgError> {
        check_account(codec, "from", &self.from_address)?;
        check_account(codec, "to", &self.to_address)?;
        check_coins(&self.amount)
    }
}

impl ModuleMsg for MsgMultiSend {
    const TYPE_URL: &'static str = "/cosmos.bank.v1beta1.MsgMultiSend";

    fn validate_basic(&self, codec: &AddressCodec) -> Result<(), MsgError> {
        if self.inputs.is_empty() {
            return Err(MsgError::Empty("inputs"));
        }
        if self.inputs.len() != 1 {
            return Err(MsgError::MultipleSenders(self.inputs.len()));
        }
        if self.outputs.is_empty() {
            return Err(MsgError::Empty("outputs"));
        }

        for input in &self.inputs {
            check_account(codec, "input", &input.address)?;
            check_coins(&input.coins)?;
        }
        for output in &self.outputs {
            check_account(codec, "output", &output.address)?;
            check_coins(&output.coins)?;
        }

        let inputs = totals(self.inputs.iter().flat_map(|i| i.coins.iter()))?;
        let outputs = totals(self.outputs.iter().flat_map(|o| o.coins.iter()))?;
        if inputs != outputs {
            return Err(MsgError::Unbalanced {
                inputs: display(&inputs),
                outputs: display(&outputs),
            });
        }

        Ok(())
    }
}

/// Builds a single-input multi-send whose input holds, per denom, the sum of all outputs.
pub fn balanced_multi_send(
    sender: &str,
    outputs: Vec<(String, Coin)>,
) -> Result<MsgMultiSend, MsgError> {
    let input_coins = sum_by_denom(outputs.iter().map(|(_, coin)| coin))
        .map_err(|err| MsgError::Coins(err.to_string()))?;

    Ok(MsgMultiSend {
        inputs: vec![Input {
            address: sender.to_string(),
            coins: input_coins.into_iter().map(Into::into).collect(),
        }],
        outputs: outputs
            .into_iter()
            .map(|(address, coin)| Output {
                address,
                coins: vec![coin.into()],
            })
            .collect(),
    })
}

fn totals<'a>(coins: impl Iterator<Item = &'a base::Coin>) -> Result<Vec<Coin>, MsgError> {
    let coins = coins
        .map(Coin::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| MsgError::Coins(err.to_string()))?;

    sum_by_denom(&coins).map_err(|err| MsgError::Coins(err.to_string()))
}

fn display(coins: &[Coin]) -> String {
    coins
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
