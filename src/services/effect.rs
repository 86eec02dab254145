//! Side effects of committed ticket transitions.
//!
//! The ticket actor turns each commit into an ordered batch of
//! [`TicketEffect`]s; the effect worker applies them to the platform after
//! the commit. Planning is pure so the batches can be asserted on directly.

use ticket_proto::{
    ActionId, CategoryId, ControlSpec, OutboundCall, OverwriteTarget, Permission,
    PermissionOverwrite, RoleId, UserId,
};

use crate::state::{ControlRef, ControlRotation, Ticket, TicketState, TransitionKind};

/// Unified effect type produced by ticket transitions.
///
/// The actor produces effects; the effect worker applies them to the
/// platform. This keeps state commits free of I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketEffect {
    /// A platform call whose reply is not needed.
    Call(OutboundCall),

    /// Delete the control message bound to `control`, if one was posted.
    RetireControl(ControlRef),

    /// Post a control message and bind its platform id to `control`.
    PostControl {
        control: ControlRef,
        content: String,
        spec: ControlSpec,
    },

    /// Direct-message a user. Failures are ignored.
    Notify { user: UserId, content: String },
}

impl TicketEffect {
    /// Short effect name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Call(call) => call.kind(),
            Self::RetireControl(_) => "retire_control",
            Self::PostControl { .. } => "post_control",
            Self::Notify { .. } => "notify",
        }
    }
}

/// Configuration the planner needs.
#[derive(Debug, Clone, Default)]
pub struct EffectContext {
    /// Category closed tickets move to.
    pub archive_category: Option<CategoryId>,
    /// Roles that keep access to archived tickets.
    pub staff_roles: Vec<RoleId>,
}

/// Actions offered by the control message for `state`.
pub fn control_actions(state: &TicketState) -> &'static [ActionId] {
    match state {
        TicketState::Unclaimed | TicketState::HelpRequested { .. } => &[ActionId::Claim],
        TicketState::Claimed { .. } => &[ActionId::RequestHelp, ActionId::Close],
        TicketState::Closed => &[],
    }
}

pub fn control_spec_for(state: &TicketState) -> ControlSpec {
    ControlSpec::from_actions(control_actions(state))
}

fn rename(ticket: &Ticket) -> TicketEffect {
    TicketEffect::Call(OutboundCall::RenameChannel {
        ticket: ticket.id.clone(),
        name: ticket.display_name(),
    })
}

fn topic_marker(ticket: &Ticket) -> TicketEffect {
    TicketEffect::Call(OutboundCall::SetTopicMarker {
        ticket: ticket.id.clone(),
        claimant: ticket.claimant().cloned(),
    })
}

fn notify_requester(ticket: &Ticket, content: String, effects: &mut Vec<TicketEffect>) {
    if let Some(user) = &ticket.requester {
        effects.push(TicketEffect::Notify {
            user: user.clone(),
            content,
        });
    }
}

/// Effects for a newly opened ticket.
pub fn plan_open(ticket: &Ticket) -> Vec<TicketEffect> {
    let greeting = match &ticket.requester {
        Some(user) => format!(
            "Hello {}, a staff member will assist you shortly.",
            user.mention()
        ),
        None => "Hello, a staff member will assist you shortly.".to_string(),
    };

    let mut effects = vec![rename(ticket)];
    if let Some(control) = ticket.control() {
        effects.push(TicketEffect::PostControl {
            control,
            content: greeting,
            spec: control_spec_for(&ticket.state),
        });
    }
    effects
}

/// Effects for a committed transition.
///
/// `ticket` is the record after the commit and `rotation` the control
/// references that commit swapped. Kinds that change nothing yield no
/// effects.
pub fn plan_transition(
    ticket: &Ticket,
    kind: TransitionKind,
    actor: &UserId,
    rotation: ControlRotation,
    ctx: &EffectContext,
) -> Vec<TicketEffect> {
    if !kind.changes_state() {
        return Vec::new();
    }

    let mut effects = Vec::new();
    if let Some(old) = rotation.retired {
        effects.push(TicketEffect::RetireControl(old));
    }

    match kind {
        TransitionKind::Claimed => {
            effects.push(rename(ticket));
            effects.push(topic_marker(ticket));
            push_control(
                &mut effects,
                ticket,
                rotation,
                format!("✅ Ticket claimed by {}", actor.mention()),
            );
            notify_requester(
                ticket,
                format!("💬 Your ticket has been claimed by {}.", actor.mention()),
                &mut effects,
            );
        }
        TransitionKind::HelpRequested => {
            effects.push(rename(ticket));
            effects.push(topic_marker(ticket));
            push_control(
                &mut effects,
                ticket,
                rotation,
                format!(
                    "🆘 {} is requesting help. Ticket reopened for other staff.",
                    actor.mention()
                ),
            );
            notify_requester(
                ticket,
                format!(
                    "💬 The staff member {} has requested help. Another staff will assist you soon.",
                    actor.mention()
                ),
                &mut effects,
            );
        }
        TransitionKind::Closed => {
            effects.push(TicketEffect::Call(OutboundCall::PostMessage {
                ticket: ticket.id.clone(),
                content: "🔒 Ticket closed and moved to archive.".to_string(),
                control: None,
            }));
            if let Some(category) = &ctx.archive_category {
                effects.push(TicketEffect::Call(OutboundCall::MoveToCategory {
                    ticket: ticket.id.clone(),
                    category: category.clone(),
                }));
            }
            effects.push(rename(ticket));
            effects.push(topic_marker(ticket));
            effects.push(TicketEffect::Call(OutboundCall::SetPermissions {
                ticket: ticket.id.clone(),
                overwrites: archive_overwrites(ticket.requester.as_ref(), &ctx.staff_roles),
            }));
            notify_requester(
                ticket,
                "💬 Your ticket has been closed. Thank you!".to_string(),
                &mut effects,
            );
        }
        TransitionKind::ReclaimAcknowledged | TransitionKind::HelpAlreadyRequested => {}
    }

    effects
}

fn push_control(
    effects: &mut Vec<TicketEffect>,
    ticket: &Ticket,
    rotation: ControlRotation,
    content: String,
) {
    if let Some(control) = rotation.issued {
        effects.push(TicketEffect::PostControl {
            control,
            content,
            spec: control_spec_for(&ticket.state),
        });
    }
}

/// Requester keeps read access, staff keep full access.
fn archive_overwrites(requester: Option<&UserId>, staff: &[RoleId]) -> Vec<PermissionOverwrite> {
    let mut overwrites = Vec::with_capacity(staff.len() + 1);
    if let Some(user) = requester {
        overwrites.push(PermissionOverwrite {
            target: OverwriteTarget::Member(user.clone()),
            allow: vec![Permission::ViewChannel],
            deny: vec![Permission::SendMessages],
        });
    }
    overwrites.extend(staff.iter().map(|role| PermissionOverwrite {
        target: OverwriteTarget::Role(role.clone()),
        allow: vec![Permission::ViewChannel, Permission::SendMessages],
        deny: Vec::new(),
    }));
    overwrites
}

/// Effects for a closed ticket whose countdown has elapsed.
pub fn plan_expiry(ticket: &Ticket) -> Vec<TicketEffect> {
    vec![TicketEffect::Call(OutboundCall::DeleteChannel {
        ticket: ticket.id.clone(),
    })]
}
