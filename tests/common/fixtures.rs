/// Excerpt of the microkernel API header covering calls, argument blocks
/// and the event and time structures.
pub const API_SOURCE: &str = "\
; F256 microkernel API (excerpt)

kernel .namespace
NextEvent = $ff00 ; Copy the next event
ReadData = $ff04 ; Copy bulk data

args .namespace
.virtual $00f0
events .dstruct kernel.event.event_t
.union
run .dstruct kernel.call_run_t
recv .dstruct kernel.call_recv_t
.endu
.endv
.endn

call_run_t .struct
block_id .byte ?
.ends
call_recv_t .struct
buf .word ?
buflen .byte ?
.ends

event .namespace
event_t .struct
type .byte ? ; Enum above
buf .byte ? ; page id or zero
.union
key .dstruct key_t
udp .dstruct udp_t
.endu
.ends
key_t .struct
keyboard .byte ?
ascii .byte ?
.ends
udp_t .struct
token .byte ?
.ends
.endn
.endn

kernel .namespace
time .namespace
t .struct
century .byte ?
year .byte ?
.ends
.endn
.endn
";

pub const API_LINES: usize = 51;
pub const API_SYMBOLS: usize = 17;

pub const EXPECTED_OUTPUT: &str = "\
; This file is automatically converted to Accelerate syntax by f256conv.
; Do not edit manually.
; Comments describing structures lost their spot in conversion.

.target \"f256\"
.visibility public

; F256 microkernel API (excerpt)

kernel_NextEvent = $ff00  ; Copy the next event
kernel_ReadData = $ff04  ; Copy bulk data

kernel_args_events_type = $f0  ; Enum above
kernel_args_events_buf = $f1  ; page id or zero
kernel_args_events_key_keyboard = $f2
kernel_args_events_key_ascii = $f3
kernel_args_events_udp_token = $f2
kernel_args_run_block_id = $f4
kernel_args_recv_buf = $f4
kernel_args_recv_buflen = $f6



kernel_event_type = $0  ; Enum above
kernel_event_buf = $1  ; page id or zero
kernel_event_key_keyboard = $2
kernel_event_key_ascii = $3
kernel_event_udp_token = $2
kernel_time_century = $0
kernel_time_year = $1
";
