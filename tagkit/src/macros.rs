macro_rules! try_vec {
	($elem:expr; $size:expr) => {{ $crate::util::alloc::fallible_vec_from_element($elem, $size)? }};
}

// Shorthand for return Err(TagError::new(ErrorKind::Foo))
//
// Usage:
// - err!(Variant)          -> return Err(TagError::new(ErrorKind::Variant))
// - err!(Variant(Message)) -> return Err(TagError::new(ErrorKind::Variant(Message)))
macro_rules! err {
	($variant:ident) => {
		return Err(crate::error::TagError::new(
			crate::error::ErrorKind::$variant,
		))
	};
	($variant:ident($reason:expr)) => {
		return Err(crate::error::TagError::new(
			crate::error::ErrorKind::$variant($reason),
		))
	};
}

// Shorthand for Id3v2Error::new(Id3v2ErrorKind::Foo).into()
//
// Usage:
// - id3v2_err!(Variant)         -> TagError
// - id3v2_err!(@BAIL Variant)   -> return Err(TagError)
macro_rules! id3v2_err {
	($variant:ident $(($($arg:expr),+))?) => {
		Into::<crate::error::TagError>::into(crate::error::Id3v2Error::new(
			crate::error::Id3v2ErrorKind::$variant $(($($arg),+))?,
		))
	};
	(@BAIL $variant:ident $(($($arg:expr),+))?) => {
		return Err(id3v2_err!($variant $(($($arg),+))?))
	};
}

// Formats a message and hands it to a `DiagnosticListener`
//
// Usage:
// - diag!(listener, Warn, "Chunk {} is too large", name)
macro_rules! diag {
	($listener:expr, $level:ident, $($arg:tt)+) => {
		$crate::diagnostics::DiagnosticListener::message(
			$listener,
			log::Level::$level,
			&format!($($arg)+),
		)
	};
}

// A macro for handling the different `ParsingMode`s
//
// NOTE: All fields are optional, if `STRICT` or `RELAXED` are missing, it will
// 		 fall through to `DEFAULT`. If `DEFAULT` is missing, it will fall through
// 		 to an empty block.
//
// Usage:
//
// - parse_mode_choice!(
// 		ident_of_parsing_mode,
// 		STRICT: some_expr,
// 		RELAXED: some_expr,
// 		DEFAULT: some_expr,
// 	 )
macro_rules! parse_mode_choice {
	(
		$parse_mode:ident,
		$(STRICT: $strict_handler:expr,)?
		$(BESTATTEMPT: $best_attempt_handler:expr,)?
		$(RELAXED: $relaxed_handler:expr,)?
		DEFAULT: $default:expr
	) => {
		match $parse_mode {
			$(crate::config::ParsingMode::Strict => { $strict_handler },)?
			$(crate::config::ParsingMode::BestAttempt => { $best_attempt_handler },)?
			$(crate::config::ParsingMode::Relaxed => { $relaxed_handler },)?
			#[allow(unreachable_patterns)]
			_ => { $default }
		}
	};
}

pub(crate) use {diag, err, id3v2_err, parse_mode_choice, try_vec};
