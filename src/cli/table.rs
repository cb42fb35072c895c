//! The command table
//!
//! Every command is matched by name at a fixed position of the command line: the global options
//! (`-h`, `-v`, `-warranty`, `-list`) at position 1, board commands at position 2 after the
//! stack level.  Names compare case-insensitively.
use super::commands as cmd;
use super::{CliResult, Shell};
use crate::Connector;

pub type Handler<C> = fn(&mut Shell<C>, &[String]) -> CliResult<()>;

pub struct Command<C: Connector> {
    pub name: &'static str,
    /// Index of the name in the command line, program name being 0
    pub name_pos: usize,
    pub handler: Handler<C>,
    pub help: &'static str,
    pub usage1: &'static str,
    pub usage2: &'static str,
    pub example: &'static str,
}

impl<C: Connector> Clone for Command<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: Connector> Copy for Command<C> {}

impl<C: Connector> Command<C> {
    fn new(
        name: &'static str,
        name_pos: usize,
        handler: Handler<C>,
        help: &'static str,
        usage1: &'static str,
        usage2: &'static str,
        example: &'static str,
    ) -> Self {
        Self {
            name,
            name_pos,
            handler,
            help,
            usage1,
            usage2,
            example,
        }
    }

    pub fn matches(&self, argv: &[String]) -> bool {
        argv.get(self.name_pos)
            .is_some_and(|arg| arg.eq_ignore_ascii_case(self.name))
    }
}

/// First command whose name sits at its position in `argv`.
pub fn find<'a, C: Connector>(table: &'a [Command<C>], argv: &[String]) -> Option<&'a Command<C>> {
    table.iter().find(|cmd| cmd.matches(argv))
}

pub fn command_table<C: Connector>() -> Vec<Command<C>> {
    #[cfg_attr(not(feature = "hw-debug"), allow(unused_mut))]
    let mut table = vec![
        Command::new(
            "-v",
            1,
            cmd::version::<C>,
            "\t-v               Display the plcpi command version number\n",
            "\tUsage:          plcpi -v\n",
            "",
            "\tExample:        plcpi -v  Display the version number\n",
        ),
        Command::new(
            "-h",
            1,
            cmd::help::<C>,
            "\t-h               Display the list of command options or one command option details\n",
            "\tUsage:          plcpi -h    Display command options list\n",
            "\tUsage:          plcpi -h <param>   Display help for <param> command option\n",
            "\tExample:        plcpi -h relwr    Display help for \"relwr\" command option\n",
        ),
        Command::new(
            "-warranty",
            1,
            cmd::warranty::<C>,
            "\t-warranty       Display the warranty\n",
            "\tUsage:          plcpi -warranty\n",
            "",
            "\tExample:        plcpi -warranty  Display the warranty text\n",
        ),
        Command::new(
            "-list",
            1,
            cmd::list::<C>,
            "\t-list:          List all plcpi boards connected,\n\t\t\treturn       nr of boards and stack level for every board\n",
            "\tUsage:          plcpi -list\n",
            "",
            "\tExample:        plcpi -list display: 1,0 \n",
        ),
        Command::new(
            "board",
            2,
            cmd::board::<C>,
            "\tboard            Display the board status and firmware version number\n",
            "\tUsage:          plcpi <stack> board\n",
            "",
            "\tExample:        plcpi 0 board  Display vcc, temperature, firmware version \n",
        ),
        Command::new(
            "relwr",
            2,
            cmd::relay_write::<C>,
            "\trelwr:          Set relays On/Off\n",
            "\tUsage:          plcpi <stack> relwr <channel> <on/off>\n",
            "\tUsage:          plcpi <stack> relwr <value>\n",
            "\tExample:        plcpi 0 relwr 2 1; Set Relay #2 on Board #0 On\n",
        ),
        Command::new(
            "relrd",
            2,
            cmd::relay_read::<C>,
            "\trelrd:          Read relays status\n",
            "\tUsage:          plcpi <stack> relrd <channel>\n",
            "\tUsage:          plcpi <stack> relrd\n",
            "\tExample:        plcpi 0 relrd 2; Read Status of Relay #2 on Board #0\n",
        ),
        Command::new(
            "reltest",
            2,
            cmd::relay_test::<C>,
            "\treltest:        Turn ON and OFF the relays until press a key\n",
            "",
            "\tUsage:          plcpi <stack> reltest\n",
            "\tExample:        plcpi 0 reltest\n",
        ),
        Command::new(
            "optrd",
            2,
            cmd::opto_read::<C>,
            "\toptrd:          Read optocoupled inputs status\n",
            "\tUsage:          plcpi <stack> optrd <channel>\n",
            "\tUsage:          plcpi <stack> optrd\n",
            "\tExample:        plcpi 0 optrd 2; Read Status of Optocoupled input ch #2 on Board #0\n",
        ),
        Command::new(
            "optedgerd",
            2,
            cmd::opto_edge_read::<C>,
            "\toptedgerd:      Read optocoupled counting edges 0 - none; 1 - rising; 2 - falling; 3 - both\n",
            "\tUsage:          plcpi <stack> optedgerd <pin> \n",
            "",
            "\tExample:        plcpi 0 optedgerd 1; Read counting edges of optocoupled input ch #1 on Board #0\n",
        ),
        Command::new(
            "optedgewr",
            2,
            cmd::opto_edge_write::<C>,
            "\toptedgewr:      Write optocoupled counting edges 0 - none; 1 - rising; 2 - falling; 3 - both\n",
            "\tUsage:          plcpi <stack> optedgewr <pin> <edge> \n",
            "",
            "\tExample:        plcpi 0 optedgewr 1 1; Set Optocoupled input ch #1 on Board #0 to count rising edges\n",
        ),
        Command::new(
            "optcntrd",
            2,
            cmd::opto_count_read::<C>,
            "\toptcntrd:       Read optocoupled inputs edges count for one pin\n",
            "\tUsage:          plcpi <stack> optcntrd <pin> \n",
            "",
            "\tExample:        plcpi 0 optcntrd 1; Read contor of opto input #1 on Board #0\n",
        ),
        Command::new(
            "optcntrst",
            2,
            cmd::opto_count_reset::<C>,
            "\toptcntrst:      Reset optocoupled inputs edges count for one pin\n",
            "\tUsage:          plcpi <stack> optcntrst <pin> \n",
            "",
            "\tExample:        plcpi 0 optcntrst 1; Reset contor of opto input #1 on Board #0\n",
        ),
        Command::new(
            "optencwr",
            2,
            cmd::opto_encoder_write::<C>,
            "\toptencwr:       Enable / Disable optocoupled quadrature encoder, encoder 1 connected to opto ch1 and 2, encoder 2 on ch3 and 4 ... \n",
            "\tUsage:          plcpi <stack> optencwr <channel> <0/1> \n",
            "",
            "\tExample:        plcpi 0 optencwr 1 1; Enable encoder on opto channels 1 and 2 on Board #0\n",
        ),
        Command::new(
            "optencrd",
            2,
            cmd::opto_encoder_read::<C>,
            "\toptencrd:       Read optocoupled quadrature encoder state 0- disabled 1 - enabled\n",
            "\tUsage:          plcpi <stack> optencrd <channel>\n",
            "",
            "\tExample:        plcpi 0 optencrd 2; Read state of optocoupled encoder channel #2 on Board #0\n",
        ),
        Command::new(
            "optcntencrd",
            2,
            cmd::opto_encoder_count_read::<C>,
            "\toptcntencrd:    Read optocoupled encoder count for one channel\n",
            "\tUsage:          plcpi <stack> optcntencrd <channel> \n",
            "",
            "\tExample:        plcpi 0 optcntencrd 1; Read contor of opto encoder #1 on Board #0\n",
        ),
        Command::new(
            "optcntencrst",
            2,
            cmd::opto_encoder_count_reset::<C>,
            "\toptcntencrst:   Reset optocoupled encoder count \n",
            "\tUsage:          plcpi <stack> optcntencrst <channel> \n",
            "",
            "\tExample:        plcpi 0 optcntencrst 1; Reset contor of encoder #1 on Board #0\n",
        ),
        Command::new(
            "cntencrd",
            2,
            cmd::encoder_count_read::<C>,
            "\tcntencrd:       Read the encoder connected to the GPIO header\n",
            "\tUsage:          plcpi <stack> cntencrd\n",
            "",
            "\tExample:        plcpi 0 cntencrd; Read the GPIO encoder count on Board #0\n",
        ),
        Command::new(
            "cntencrst",
            2,
            cmd::encoder_count_reset::<C>,
            "\tcntencrst:      Reset the encoder connected to the GPIO header\n",
            "\tUsage:          plcpi <stack> cntencrst\n",
            "",
            "\tExample:        plcpi 0 cntencrst; Reset the GPIO encoder count on Board #0\n",
        ),
        Command::new(
            "incmd",
            2,
            cmd::input_command::<C>,
            "\tincmd:          Set an optocoupled input to start a pulse burst on an open-drain output\n",
            "\tUsage:          plcpi <stack> incmd <input ch> <od ch> <pulses>\n",
            "",
            "\tExample:        plcpi 0 incmd 1 2 200; Opto input #1 starts 200 pulses on open-drain #2\n",
        ),
        Command::new(
            "odrd",
            2,
            cmd::od_read::<C>,
            "\todrd:           Read open drain output pwm value (0% - 100%)\n",
            "\tUsage:          plcpi <stack> odrd <channel>\n",
            "",
            "\tExample:        plcpi 0 odrd 2; Read pwm value of open drain channel #2 on Board #0\n",
        ),
        Command::new(
            "odwr",
            2,
            cmd::od_write::<C>,
            "\todwr:           Write open drain output pwm value (0% - 100%)\n",
            "\tUsage:          plcpi <stack> odwr <channel> <value>\n",
            "",
            "\tExample:        plcpi 0 odwr 2 12.5; Set pwm value of open drain channel #2 on Board #0 to 12.5%\n",
        ),
        Command::new(
            "odcrd",
            2,
            cmd::od_count_read::<C>,
            "\todcrd:          Read open drain output remaining pulses\n",
            "\tUsage:          plcpi <stack> odcrd <channel>\n",
            "",
            "\tExample:        plcpi 0 odcrd 2; Read remaining pulses of open drain channel #2 on Board #0\n",
        ),
        Command::new(
            "odcwr",
            2,
            cmd::od_count_write::<C>,
            "\todcwr:          Start a pulse burst on an open drain output\n",
            "\tUsage:          plcpi <stack> odcwr <channel> <count>\n",
            "",
            "\tExample:        plcpi 0 odcwr 2 1000; Send 1000 pulses on open drain channel #2 on Board #0\n",
        ),
        Command::new(
            "odcs",
            2,
            cmd::od_count_save::<C>,
            "\todcs:           Stage a pulse count on an open drain output without starting it\n",
            "\tUsage:          plcpi <stack> odcs <channel> <count>\n",
            "",
            "\tExample:        plcpi 0 odcs 2 1000; Stage 1000 pulses for open drain channel #2 on Board #0\n",
        ),
        Command::new(
            "odcx",
            2,
            cmd::od_count_exec::<C>,
            "\todcx:           Start the staged pulse count on an open drain output\n",
            "\tUsage:          plcpi <stack> odcx <channel>\n",
            "",
            "\tExample:        plcpi 0 odcx 2; Start the staged pulses of open drain channel #2 on Board #0\n",
        ),
        Command::new(
            "odcrst",
            2,
            cmd::od_count_reset::<C>,
            "\todcrst:         Stop pulses on an open drain output\n",
            "\tUsage:          plcpi <stack> odcrst <channel>\n",
            "",
            "\tExample:        plcpi 0 odcrst 2; Clear pulses of open drain channel #2 on Board #0\n",
        ),
        Command::new(
            "pwmfrd",
            2,
            cmd::pwm_freq_read::<C>,
            "\tpwmfrd:         Read the open drain outputs pwm frequency in Hz\n",
            "\tUsage:          plcpi <stack> pwmfrd\n",
            "",
            "\tExample:        plcpi 0 pwmfrd; Read the pwm frequency of Board #0\n",
        ),
        Command::new(
            "pwmfwr",
            2,
            cmd::pwm_freq_write::<C>,
            "\tpwmfwr:         Write the open drain outputs pwm frequency in Hz [10..65500]\n",
            "\tUsage:          plcpi <stack> pwmfwr <value>\n",
            "\tUsage:          plcpi <stack> pwmfwr <channel> <value>\n",
            "\tExample:        plcpi 0 pwmfwr 200; Set the pwm frequency of Board #0 to 200Hz\n",
        ),
        Command::new(
            "mvpwr",
            2,
            cmd::move_profile_write::<C>,
            "\tmvpwr:          Write the movement profile of an open drain pulse output\n",
            "\tUsage:          plcpi <stack> mvpwr <channel> <acc> <dec> <min speed> <max speed>\n",
            "",
            "\tExample:        plcpi 0 mvpwr 1 1000 1000 100 5000; Ramp pulses of open drain #1 between 100 and 5000Hz\n",
        ),
        Command::new(
            "encthwr",
            2,
            cmd::encoder_threshold_write::<C>,
            "\tencthwr:        Write the count limit of an optocoupled encoder\n",
            "\tUsage:          plcpi <stack> encthwr <channel> <value>\n",
            "",
            "\tExample:        plcpi 0 encthwr 1 2000; Set the limit of encoder #1 on Board #0 to 2000\n",
        ),
    ];

    #[cfg(feature = "hw-debug")]
    table.push(Command::new(
        "err",
        2,
        cmd::error_log::<C>,
        "\terr:            Display the firmware error log\n",
        "\tUsage:          plcpi <stack> err\n",
        "",
        "\tExample:        plcpi 0 err\n",
    ));

    table
}
