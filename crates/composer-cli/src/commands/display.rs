//! Colored terminal rendering shared by the commands.

use colored::{ColoredString, Colorize};
use composer_core::message::{AgentType, MessageType};
use composer_core::AgentMessage;
use composer_infrastructure::ValidationReport;

fn label(message: &AgentMessage) -> ColoredString {
    match (message.message_type, message.agent_type()) {
        (MessageType::User, _) => "[you]".green().bold(),
        (_, Some(AgentType::Conversation)) => "[conversation]".bright_magenta(),
        (_, Some(AgentType::Specification)) => "[specification]".bright_magenta(),
        (_, Some(AgentType::CodeGeneration)) => "[code generation]".bright_magenta(),
        (_, Some(AgentType::Error)) => "[error]".red().bold(),
        (_, None) => "[agent]".bright_magenta(),
    }
}

pub fn print_message(message: &AgentMessage) {
    println!("{}", label(message));
    for line in message.content.lines() {
        if message.is_error() {
            println!("{}", line.red());
        } else if message.message_type == MessageType::User {
            println!("{}", line.green());
        } else {
            println!("{}", line.bright_blue());
        }
    }
    println!();
}

pub fn print_report(report: &ValidationReport) {
    if report.valid {
        println!("{}", "valid".bright_green().bold());
    } else {
        println!("{}", "invalid".red().bold());
    }
    for error in &report.errors {
        println!("  {} {}", "error:".red(), error);
    }
    for warning in &report.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }
    for suggestion in &report.suggestions {
        println!("  {} {}", "suggestion:".bright_black(), suggestion);
    }
}
