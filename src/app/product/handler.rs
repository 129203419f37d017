//! 交互命令处理器
//!
//! 终端界面的每一行输入对应一个 [`Command`]，由 [`dispatch`] 转换为组件操作。

use std::str::FromStr;

use super::model::DraftField;
use super::service::ProductCrud;
use crate::core::service::{CatalogApi, Confirm};

pub const HELP: &str = "\
commands:
  refresh                 reload the product list
  edit <id>               load a product into the form
  set <field> <value>     change a form field (name, price, quantity, description)
  submit                  create or update the product in the form
  cancel                  clear the form
  delete <id>             delete a listed product (asks for confirmation)
  help                    show this help
  quit                    exit";

/// 交互命令
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Refresh,
    Edit(String),
    Set(DraftField, String),
    Submit,
    Cancel,
    Delete(String),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let required = |what: &str| {
            if rest.is_empty() {
                Err(format!("usage: {} {}", verb, what))
            } else {
                Ok(rest.to_string())
            }
        };

        match verb.to_ascii_lowercase().as_str() {
            "refresh" | "r" | "list" => Ok(Command::Refresh),
            "edit" | "e" => required("<id>").map(Command::Edit),
            "set" => {
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None => (rest, ""),
                };
                if field.is_empty() {
                    return Err("usage: set <field> <value>".to_string());
                }
                Ok(Command::Set(field.parse()?, value.to_string()))
            }
            "submit" | "save" => Ok(Command::Submit),
            "cancel" => Ok(Command::Cancel),
            "delete" | "rm" => required("<id>").map(Command::Delete),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command: {}", other)),
        }
    }
}

/// 命令执行后的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    ShowHelp,
    Quit,
}

/// 执行一条命令
pub async fn dispatch<A: CatalogApi>(
    crud: &mut ProductCrud<A>,
    command: Command,
    confirm: &mut impl Confirm,
) -> Flow {
    match command {
        Command::Refresh => crud.fetch_all().await,
        Command::Edit(id) => match crud.find(&id).cloned() {
            Some(product) => crud.edit(product),
            None => crud.report_error(format!("Product {} not found", id)),
        },
        Command::Set(field, value) => crud.set_field(field, value),
        Command::Submit => crud.submit().await,
        Command::Cancel => crud.cancel(),
        Command::Delete(id) => match crud.resolve_id(&id) {
            Some(id) => crud.delete_record(&id, confirm).await,
            None => crud.report_error(format!("Product {} not found", id)),
        },
        Command::Help => return Flow::ShowHelp,
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("refresh".parse::<Command>(), Ok(Command::Refresh));
        assert_eq!(" edit 42 ".parse::<Command>(), Ok(Command::Edit("42".to_string())));
        assert_eq!(
            "set description Blue ink, fine tip".parse::<Command>(),
            Ok(Command::Set(
                DraftField::Description,
                "Blue ink, fine tip".to_string()
            ))
        );
        assert_eq!(
            "set price".parse::<Command>(),
            Ok(Command::Set(DraftField::Price, String::new()))
        );
        assert_eq!("DELETE 7".parse::<Command>(), Ok(Command::Delete("7".to_string())));
        assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!("edit".parse::<Command>().is_err());
        assert!("set".parse::<Command>().is_err());
        assert!("set colour red".parse::<Command>().is_err());
        assert!("launch".parse::<Command>().is_err());
        assert!("".parse::<Command>().is_err());
    }
}
