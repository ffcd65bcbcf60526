//! LuvvTapp CLI 客户端
//!
//! 非交互式 CLI：每次执行一个命令，启动控制器、执行操作后退出
//! 状态变化通过监听器输出到日志

use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand, ValueEnum};
use luvvtapp_client_rust::coach::advice::AdviceTopic;
use luvvtapp_client_rust::coach::relationship::{PartnerPreferences, RelationshipForm, RelationshipType};
use luvvtapp_client_rust::coach::session::QuickAction;
use luvvtapp_client_rust::coach::user::{
    OnboardingForm, SelfAssessment, LOVE_LANGUAGES, PERSONALITY_TYPES,
};
use luvvtapp_client_rust::{ClientConfig, CoachClient, CoachListener};
use std::sync::Arc;
use tracing::{error, info, warn};

/// LuvvTapp CLI 客户端
#[derive(Parser, Debug)]
#[command(name = "luvvtapp-cli")]
#[command(about = "LuvvTapp CLI 客户端 - 与恋爱教练对话、管理关系和建议", long_about = None)]
struct Args {
    /// 后端 API 地址
    #[arg(long, env = "API_BASE_URL", default_value = "http://localhost:8000")]
    api_base_url: String,

    /// 本地数据库 URL（保存用户 ID）
    #[arg(long, default_value = "sqlite://luvvtapp.db?mode=rwc")]
    db_url: String,

    /// 日志级别（默认: info,luvvtapp_client_rust=debug）
    #[arg(long, default_value = "info,luvvtapp_client_rust=debug")]
    log_level: String,

    /// 日志文件（追加模式）
    #[arg(long, default_value = "debug.log")]
    log_file: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 后端健康检查
    Health,
    /// 创建用户资料
    Onboard {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// MBTI 人格类型
        #[arg(long, value_parser = PossibleValuesParser::new(PERSONALITY_TYPES))]
        personality: Option<String>,
        #[arg(long, value_parser = PossibleValuesParser::new(LOVE_LANGUAGES))]
        love_language: Option<String>,
        #[arg(long)]
        communication_style: Option<String>,
    },
    /// 显示用户资料
    Profile,
    /// 更新自我评估
    Assessment {
        /// MBTI 人格类型
        #[arg(long, value_parser = PossibleValuesParser::new(PERSONALITY_TYPES))]
        personality: Option<String>,
        #[arg(long, value_parser = PossibleValuesParser::new(LOVE_LANGUAGES))]
        love_language: Option<String>,
        #[arg(long)]
        communication_style: Option<String>,
        /// 逗号分隔
        #[arg(long, value_delimiter = ',')]
        strengths: Vec<String>,
        /// 逗号分隔
        #[arg(long, value_delimiter = ',')]
        growth_areas: Vec<String>,
    },
    /// 关系管理
    Relationships {
        #[command(subcommand)]
        command: RelationshipCommand,
    },
    /// 发送聊天消息
    Chat {
        /// 以关系列表中的第 N 个关系为上下文
        #[arg(long, conflicts_with = "session")]
        relationship: Option<usize>,
        /// 继续已有会话
        #[arg(long)]
        session: Option<String>,
        message: String,
    },
    /// 发送快捷提问
    Quick { action: QuickArg },
    /// 会话历史
    Sessions {
        #[command(subcommand)]
        command: SessionCommand,
    },
    /// 主题建议
    Advice {
        #[command(subcommand)]
        command: AdviceCommand,
    },
}

#[derive(Subcommand, Debug)]
enum RelationshipCommand {
    List,
    Add {
        #[arg(long = "type")]
        relationship_type: RelationshipType,
        #[arg(long)]
        name: String,
        /// MBTI 人格类型
        #[arg(long, value_parser = PossibleValuesParser::new(PERSONALITY_TYPES))]
        personality: Option<String>,
        #[arg(long, value_parser = PossibleValuesParser::new(LOVE_LANGUAGES))]
        love_language: Option<String>,
        #[arg(long)]
        communication_style: Option<String>,
        /// 逗号分隔的兴趣
        #[arg(long, default_value = "")]
        interests: String,
        #[arg(long)]
        birthday: Option<String>,
        #[arg(long)]
        anniversary: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    List,
    Open { session_id: String },
    Delete { session_id: String },
}

#[derive(Subcommand, Debug)]
enum AdviceCommand {
    List,
    Get {
        advice_id: String,
    },
    Create {
        #[arg(long)]
        topic: AdviceTopic,
        #[arg(long)]
        situation: String,
        /// 关联关系列表中的第 N 个伴侣
        #[arg(long)]
        partner: Option<usize>,
    },
    Delete {
        advice_id: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum QuickArg {
    Communication,
    DateIdeas,
    Conflict,
}

impl From<QuickArg> for QuickAction {
    fn from(arg: QuickArg) -> Self {
        match arg {
            QuickArg::Communication => QuickAction::CommunicationTips,
            QuickArg::DateIdeas => QuickAction::DateIdeas,
            QuickArg::Conflict => QuickAction::ConflictResolution,
        }
    }
}

/// 初始化日志（同时输出到 stdout 和文件）
fn init_logger(log_level: &str, log_file: &str) -> Result<()> {
    use anyhow::Context;
    use std::fs::OpenOptions;
    use std::io;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    // 优先使用环境变量 RUST_LOG（如果设置了），否则使用命令行参数
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("无法创建日志文件 {}", log_file))?;

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(true);

    // 文件不需要颜色
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("[CLI] 📝 日志已同时输出到控制台和文件: {}", log_file);
    Ok(())
}

/// 把所有状态变化输出到日志
struct CliListener;

#[async_trait::async_trait]
impl CoachListener for CliListener {
    async fn on_user_changed(&self, user_json: String) {
        info!("[CLI/User] 👤 用户资料: {}", user_json);
    }

    async fn on_relationships_changed(&self, relationships_json: String) {
        info!("[CLI/Relationship] 💕 关系列表: {}", relationships_json);
    }

    async fn on_context_changed(&self, relationship_json: String) {
        info!("[CLI/Chat] 🎯 聊天上下文: {}", relationship_json);
    }

    async fn on_messages_changed(&self, messages_json: String) {
        info!("[CLI/Chat] 💬 对话消息: {}", messages_json);
    }

    async fn on_sessions_changed(&self, sessions_json: String) {
        info!("[CLI/Session] 📚 会话列表: {}", sessions_json);
    }

    async fn on_advice_list_changed(&self, advice_json: String) {
        info!("[CLI/Advice] 📋 建议列表: {}", advice_json);
    }

    async fn on_current_advice_changed(&self, advice_json: String) {
        info!("[CLI/Advice] 📖 当前建议: {}", advice_json);
    }

    async fn on_request_failed(&self, operation: String, error: String) {
        error!("[CLI] ❌ {}失败: {}", operation, error);
    }
}

/// 执行子命令，返回操作是否成功
async fn run(client: &mut CoachClient, command: Command) -> bool {
    match command {
        Command::Health => {
            let healthy = client.check_health().await;
            info!("[CLI] 🔗 后端连接: {}", if healthy { "正常" } else { "异常" });
            healthy
        }
        Command::Onboard {
            name,
            email,
            personality,
            love_language,
            communication_style,
        } => {
            let form = OnboardingForm {
                name,
                email,
                personality_type: personality,
                love_language,
                communication_style,
            };
            client.submit_onboarding(form).await
        }
        Command::Profile => match client.user_profile() {
            Some(profile) => {
                info!("[CLI] 👤 {} <{}>", profile.name, profile.email);
                true
            }
            None => {
                warn!("[CLI] 尚未创建用户资料，请先执行 onboard");
                false
            }
        },
        Command::Assessment {
            personality,
            love_language,
            communication_style,
            strengths,
            growth_areas,
        } => {
            let assessment = SelfAssessment {
                personality_type: personality,
                love_language,
                communication_style,
                strengths,
                growth_areas,
                ..Default::default()
            };
            client.update_self_assessment(assessment).await
        }
        Command::Relationships { command } => match command {
            RelationshipCommand::List => {
                for (i, rel) in client.relationships().iter().enumerate() {
                    info!(
                        "[CLI]   [{}] {} ({})",
                        i,
                        rel.partner_profile.display_name(),
                        rel.relationship_type
                    );
                }
                true
            }
            RelationshipCommand::Add {
                relationship_type,
                name,
                personality,
                love_language,
                communication_style,
                interests,
                birthday,
                anniversary,
            } => {
                let mut form = RelationshipForm::new(relationship_type, name);
                form.personality_type = personality;
                form.love_language = love_language;
                form.communication_style = communication_style;
                form.interests = interests;
                form.preferences = PartnerPreferences {
                    birthday,
                    anniversary,
                    ..Default::default()
                };
                client.add_relationship(form).await
            }
        },
        Command::Chat {
            relationship,
            session,
            message,
        } => {
            if let Some(index) = relationship {
                if !client.select_relationship(index).await {
                    return false;
                }
            }
            if let Some(session_id) = session {
                if !client.open_session(&session_id).await {
                    return false;
                }
            }
            client.send_message(&message).await
        }
        Command::Quick { action } => client.send_quick_action(action.into()).await,
        Command::Sessions { command } => match command {
            SessionCommand::List => {
                for s in client.sessions() {
                    info!(
                        "[CLI]   {} | {} | 更新于: {}",
                        s.session_id,
                        s.context.context_type(),
                        s.updated_at
                            .map(|t| t.to_rfc3339())
                            .unwrap_or_else(|| "-".to_string())
                    );
                }
                true
            }
            SessionCommand::Open { session_id } => client.open_session(&session_id).await,
            SessionCommand::Delete { session_id } => client.delete_session(&session_id).await,
        },
        Command::Advice { command } => match command {
            AdviceCommand::List => {
                for a in client.advice_list() {
                    info!("[CLI]   {} | {} | {}", a.advice_id, a.topic, a.preview);
                }
                true
            }
            AdviceCommand::Get { advice_id } => client.open_advice(&advice_id).await,
            AdviceCommand::Create {
                topic,
                situation,
                partner,
            } => {
                let shown = client.set_advice_situation(&situation).chars().count();
                if shown < situation.chars().count() {
                    warn!("[CLI] 情况描述过长，已截断为 {} 个字符", shown);
                }
                client.set_advice_topic(topic);
                if !client.set_advice_partner(partner) {
                    return false;
                }
                client.submit_advice().await
            }
            AdviceCommand::Delete { advice_id } => client.delete_advice(&advice_id).await,
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(&args.log_level, &args.log_file)?;

    info!("[CLI] 🚀 LuvvTapp CLI 客户端");
    info!("[CLI] 🌐 API地址: {}", args.api_base_url);

    let config = ClientConfig::new()
        .with_api_base_url(args.api_base_url)
        .with_db_url(args.db_url);
    let mut client = CoachClient::new(config).await?;
    client.set_listener(Arc::new(CliListener));

    // 健康检查不需要用户资料
    let needs_user = !matches!(args.command, Command::Health);
    if needs_user && !client.bootstrap().await {
        return Err(anyhow::anyhow!("启动失败：无法获取用户资料"));
    }

    if run(&mut client, args.command).await {
        info!("[CLI] ✅ 完成");
    } else {
        warn!("[CLI] ⚠️ 操作未完成");
    }
    Ok(())
}
