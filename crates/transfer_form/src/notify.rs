//! User-facing notifications and link opening.
//!
//! The form never talks to a UI directly; the host supplies a [`Notifier`]
//! for toasts and a [`LinkOpener`] for opening URLs.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn success(title: &str, description: &str) -> Self {
        Self {
            kind: ToastKind::Success,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    pub fn error(title: &str, description: &str) -> Self {
        Self {
            kind: ToastKind::Error,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    pub fn booking_created() -> Self {
        Self::success(
            "Reserva criada com sucesso!",
            "O evento foi adicionado ao calendário do motorista.",
        )
    }

    /// `reason` is the upstream message, or `None` when the endpoint was unreachable.
    pub fn booking_failed(reason: Option<&str>) -> Self {
        Self::error(
            "Erro ao enviar reserva",
            reason.unwrap_or("Por favor, tente novamente."),
        )
    }

    pub fn popup_blocked() -> Self {
        Self::error(
            "Pop-up bloqueado!",
            "Use o botão abaixo para abrir o WhatsApp.",
        )
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Opens a URL in the host environment.
pub trait LinkOpener: Send + Sync {
    /// Returns `false` when the host refused to open it (e.g. a pop-up blocker).
    fn open(&self, url: &str) -> bool;
}
