// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Programmable transaction description handed to the wallet for signing.

use crate::base_types::{ObjectID, SuiAddress};
use crate::config::is_configured_package_id;
use crate::errors::{JournalError, JournalResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

pub const JOURNAL_MODULE: &str = "journal";
pub const NEW_JOURNAL_FUNCTION: &str = "new_journal";

const SUI_ADDRESS_LENGTH: usize = 32;

/// A pure (non-object) input value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum PureValue {
    String(String),
    Address(SuiAddress),
}

impl PureValue {
    /// BCS encoding expected by the Move VM for this value.
    pub fn to_bcs_bytes(&self) -> Result<Vec<u8>, anyhow::Error> {
        match self {
            PureValue::String(s) => Ok(bcs::to_bytes(s)?),
            PureValue::Address(addr) => {
                let hex_str = addr.as_str().trim_start_matches("0x");
                if hex_str.len() > SUI_ADDRESS_LENGTH * 2 {
                    anyhow::bail!("address {addr} is longer than {SUI_ADDRESS_LENGTH} bytes");
                }
                let padded = format!("{:0>width$}", hex_str, width = SUI_ADDRESS_LENGTH * 2);
                let bytes = hex::decode(padded)
                    .map_err(|e| anyhow::anyhow!("address {addr} is not hex: {e}"))?;
                // Fixed-size arrays carry no length prefix in BCS.
                Ok(bytes)
            }
        }
    }
}

impl Display for PureValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PureValue::String(s) => write!(f, "{s:?}"),
            PureValue::Address(addr) => write!(f, "{addr}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CallArg {
    Pure(PureValue),
}

impl Display for CallArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CallArg::Pure(v) => write!(f, "{v}"),
        }
    }
}

/// An argument to a programmable transaction command.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Argument {
    /// One of the transaction inputs.
    Input(u16),
    /// The value produced by an earlier command.
    Result(u16),
}

impl Display for Argument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(i) => write!(f, "Input({i})"),
            Self::Result(i) => write!(f, "Result({i})"),
        }
    }
}

/// Fully qualified Move function, `package::module::function`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCallTarget {
    pub package: ObjectID,
    pub module: String,
    pub function: String,
}

impl MoveCallTarget {
    pub fn new(package: ObjectID, module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            package,
            module: module.into(),
            function: function.into(),
        }
    }

    /// `<package>::journal::new_journal`
    pub fn new_journal(package: ObjectID) -> Self {
        Self::new(package, JOURNAL_MODULE, NEW_JOURNAL_FUNCTION)
    }
}

impl Display for MoveCallTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.package, self.module, self.function)
    }
}

impl FromStr for MoveCallTarget {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split("::").collect();
        let [package, module, function] = parts.as_slice() else {
            return Err(JournalError::Configuration(format!(
                "`{s}` is not of the form package::module::function"
            )));
        };
        if !is_configured_package_id(package) {
            return Err(JournalError::Configuration(format!(
                "package `{package}` in target `{s}` is not configured"
            )));
        }
        if module.is_empty() || function.is_empty() {
            return Err(JournalError::Configuration(format!(
                "`{s}` has an empty module or function name"
            )));
        }
        Ok(Self::new(ObjectID::new(*package), *module, *function))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableMoveCall {
    pub target: MoveCallTarget,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
    /// Sends the objects to the address given by the second argument.
    TransferObjects(Vec<Argument>, Argument),
}

/// Ordered commands over a list of inputs, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

impl TransactionRequest {
    pub fn move_calls(&self) -> impl Iterator<Item = &ProgrammableMoveCall> {
        self.commands.iter().filter_map(|c| match c {
            Command::MoveCall(call) => Some(call.as_ref()),
            _ => None,
        })
    }

    pub fn transfers(&self) -> impl Iterator<Item = (&[Argument], &Argument)> {
        self.commands.iter().filter_map(|c| match c {
            Command::TransferObjects(objs, recipient) => Some((objs.as_slice(), recipient)),
            _ => None,
        })
    }

    /// Resolve an argument to the input it refers to, if any.
    pub fn input(&self, arg: &Argument) -> Option<&CallArg> {
        match arg {
            Argument::Input(i) => self.inputs.get(*i as usize),
            Argument::Result(_) => None,
        }
    }

    /// BCS bytes of each input, in input order.
    pub fn input_bytes(&self) -> Result<Vec<Vec<u8>>, anyhow::Error> {
        self.inputs
            .iter()
            .map(|arg| match arg {
                CallArg::Pure(v) => v.to_bcs_bytes(),
            })
            .collect()
    }

    fn fmt_arg(&self, f: &mut Formatter<'_>, arg: &Argument) -> fmt::Result {
        match self.input(arg) {
            Some(input) => write!(f, "{input}"),
            None => write!(f, "{arg}"),
        }
    }
}

impl Display for TransactionRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, command) in self.commands.iter().enumerate() {
            if idx > 0 {
                write!(f, "; ")?;
            }
            match command {
                Command::MoveCall(call) => {
                    write!(f, "call({}, [", call.target)?;
                    for (i, arg) in call.arguments.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        self.fmt_arg(f, arg)?;
                    }
                    write!(f, "]) -> {}", Argument::Result(idx as u16))?;
                }
                Command::TransferObjects(objs, recipient) => {
                    write!(f, "transfer([")?;
                    for (i, arg) in objs.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        self.fmt_arg(f, arg)?;
                    }
                    write!(f, "], ")?;
                    self.fmt_arg(f, recipient)?;
                    write!(f, ")")?;
                }
            }
        }
        write!(f, "]")
    }
}

#[derive(Default, Debug)]
pub struct ProgrammableTransactionBuilder {
    inputs: Vec<CallArg>,
    commands: Vec<Command>,
}

impl ProgrammableTransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> TransactionRequest {
        TransactionRequest {
            inputs: self.inputs,
            commands: self.commands,
        }
    }

    pub fn pure(&mut self, value: PureValue) -> Argument {
        let arg = CallArg::Pure(value);
        // Identical pure inputs are shared.
        if let Some(idx) = self.inputs.iter().position(|a| a == &arg) {
            return Argument::Input(idx as u16);
        }
        self.inputs.push(arg);
        Argument::Input((self.inputs.len() - 1) as u16)
    }

    pub fn command(&mut self, command: Command) -> Argument {
        self.commands.push(command);
        Argument::Result((self.commands.len() - 1) as u16)
    }

    pub fn move_call(&mut self, target: MoveCallTarget, arguments: Vec<Argument>) -> Argument {
        self.command(Command::MoveCall(Box::new(ProgrammableMoveCall {
            target,
            arguments,
        })))
    }

    pub fn transfer_args(&mut self, recipient: SuiAddress, args: Vec<Argument>) {
        let rec_arg = self.pure(PureValue::Address(recipient));
        self.command(Command::TransferObjects(args, rec_arg));
    }
}

/// Build the create-and-transfer transaction for a new journal.
pub fn build_create_journal(
    target: MoveCallTarget,
    title: &str,
    recipient: SuiAddress,
) -> JournalResult<TransactionRequest> {
    if !is_configured_package_id(target.package.as_str()) {
        return Err(JournalError::Configuration(format!(
            "journal package `{}` is not configured",
            target.package
        )));
    }
    if title.trim().is_empty() {
        return Err(JournalError::InvalidInput("journal title must not be empty".into()));
    }

    let mut builder = ProgrammableTransactionBuilder::new();
    let title_arg = builder.pure(PureValue::String(title.to_owned()));
    let journal = builder.move_call(target, vec![title_arg]);
    builder.transfer_args(recipient, vec![journal]);
    Ok(builder.finish())
}

#[cfg(test)]
#[path = "unit_tests/transaction_tests.rs"]
mod transaction_tests;
